//! Human-readable and JSON renderings of a report

use std::io::Write;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::io::csv_format::format_money;
use crate::types::{ReportError, ReportResult};

/// Write a plain-text summary of `result`
///
/// Sections: period and counts, cash flow with a signed net, category
/// breakdown, monthly trend, top expenses and skipped records.
pub fn write_summary(result: &ReportResult, output: &mut dyn Write) -> Result<(), ReportError> {
    let summary = &result.cash_flow_summary;

    writeln!(output, "Cash flow report for {}", result.agency_id)?;
    writeln!(
        output,
        "Period: {} to {}",
        result.range.from(),
        result.range.to()
    )?;
    writeln!(
        output,
        "Transactions: {} ({} inflows, {} outflows)",
        result.transactions.len(),
        result.inflows().len(),
        result.outflows().len()
    )?;
    writeln!(output)?;

    writeln!(output, "Total inflows:  {:>14}", format_money(summary.total_inflows))?;
    writeln!(output, "Total outflows: {:>14}", format_money(summary.total_outflows))?;
    let deficit = if summary.is_deficit() { " (deficit)" } else { "" };
    writeln!(
        output,
        "Net cash flow:  {:>14}{}",
        signed_money(summary.net_cash_flow),
        deficit
    )?;

    if result.outflow_statistics.count > 0 {
        writeln!(
            output,
            "Average outflow: {}, largest: {}",
            format_money(result.outflow_statistics.average),
            format_money(result.outflow_statistics.largest)
        )?;
    }

    if !result.category_breakdown.is_empty() {
        writeln!(output)?;
        writeln!(output, "Category breakdown:")?;
        for aggregate in &result.category_breakdown {
            writeln!(
                output,
                "  {:<20} {:>14} {:>6}%",
                aggregate.category,
                format_money(aggregate.total_amount),
                percent(aggregate.percentage_of_total)
            )?;
        }
    }

    if !result.monthly_trend.is_empty() {
        writeln!(output)?;
        writeln!(output, "Monthly trend:")?;
        for month in &result.monthly_trend {
            writeln!(
                output,
                "  {} {:>14}",
                month.month_key,
                format_money(month.total_amount)
            )?;
        }
    }

    if !result.top_expenses.is_empty() {
        writeln!(output)?;
        writeln!(output, "Top expenses:")?;
        for (rank, tx) in result.top_expenses.iter().enumerate() {
            writeln!(
                output,
                "  {}. {} {:<32} {:>14}",
                rank + 1,
                tx.date().format("%Y-%m-%d"),
                tx.description(),
                format_money(tx.amount())
            )?;
        }
    }

    if result.has_skipped_records() {
        writeln!(output)?;
        writeln!(output, "Skipped records: {}", result.failure_count())?;
        for failure in &result.adaptation_failures {
            writeln!(output, "  {}", failure)?;
        }
    }

    output.flush()?;
    Ok(())
}

/// Write `result` as pretty-printed JSON
pub fn write_json(result: &ReportResult, output: &mut dyn Write) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *output, result)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn signed_money(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format_money(amount)
    } else {
        format!("+{}", format_money(amount))
    }
}

fn percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}", rounded)
}
