//! CSV export of report transactions
//!
//! This module centralizes the delimited-text format:
//! - Fixed header `Date,Type,Description,Category,Amount`
//! - One row per transaction, most recent first, every field double-quoted
//! - ISO calendar dates and amounts with exactly two decimals
//!
//! Row order is decided here, not by the caller, so the same set of
//! transactions always produces the same bytes.

use std::cmp::Ordering;
use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{DateRange, ReportError, ReportResult, Transaction};

/// Header row of the export
pub const CSV_HEADER: [&str; 5] = ["Date", "Type", "Description", "Category", "Amount"];

/// MIME type of the export, for shells serving it as a download
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Serialize transactions to CSV text
///
/// # Errors
///
/// Returns [`ReportError::Export`] if serialization fails.
pub fn to_delimited_text(transactions: &[Transaction]) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    write_transactions_csv(transactions, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ReportError::export(&e.to_string()))
}

/// Serialize the transactions of a report
pub fn export_report(result: &ReportResult) -> Result<String, ReportError> {
    to_delimited_text(&result.transactions)
}

/// Suggested download name, e.g. `cash-flow-2024-01-01-to-2024-01-31.csv`
pub fn export_file_name(range: &DateRange) -> String {
    format!(
        "cash-flow-{}-to-{}.csv",
        range.from().format("%Y-%m-%d"),
        range.to().format("%Y-%m-%d")
    )
}

/// Write transactions in CSV format
///
/// The header is written bare and every data field is quoted, with embedded
/// quotes doubled.
///
/// # Arguments
///
/// * `transactions` - Transactions to write, in any order
/// * `output` - Writer receiving the CSV text
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), ReportError> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(&mut *output);
    header.write_record(CSV_HEADER)?;
    header
        .flush()
        .map_err(|e| ReportError::export(&format!("Failed to write CSV header: {}", e)))?;
    drop(header);

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| export_order(a, b));

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(&mut *output);
    for tx in sorted {
        writer.write_record([
            tx.date().format("%Y-%m-%d").to_string(),
            tx.flow().to_string(),
            tx.description().to_string(),
            tx.category().to_string(),
            format_money(tx.amount()),
        ])?;
    }

    writer
        .flush()
        .map_err(|e| ReportError::export(&format!("Failed to flush output: {}", e)))?;

    Ok(())
}

/// Date descending, then every remaining field so that no two distinct
/// transactions compare equal
fn export_order(a: &Transaction, b: &Transaction) -> Ordering {
    b.date()
        .cmp(&a.date())
        .then_with(|| a.source().cmp(&b.source()))
        .then_with(|| a.id().cmp(b.id()))
        .then_with(|| a.category().cmp(b.category()))
        .then_with(|| a.description().cmp(b.description()))
        .then_with(|| a.amount().cmp(&b.amount()))
}

/// Two decimals, `.` separator, no grouping
pub(crate) fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
