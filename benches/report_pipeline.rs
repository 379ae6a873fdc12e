//! Benchmark suite for the report pipeline stages
//!
//! Measures adaptation, filtering, aggregation and CSV export over synthetic
//! agency data using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! # Datasets
//!
//! Records are generated in memory, one third of each source, spread over the
//! 365 days of 2024. Sizes: 100, 1,000 and 100,000 records.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use divan::Bencher;
use fleet_reports::core::{
    adapt_sources, category_breakdown, filter_transactions, monthly_trend, summarize,
    top_outflows,
};
use fleet_reports::io::to_delimited_text;
use fleet_reports::types::{ExpenseRecord, MaintenanceRecord, ReservationRecord};
use fleet_reports::{DateRange, Transaction, TransactionFilter};
use rust_decimal::Decimal;

const SIZES: &[usize] = &[100, 1_000, 100_000];
const CATEGORIES: [&str; 4] = ["Fuel", "Tolls", "Cleaning", "Insurance"];

fn main() {
    divan::main();
}

fn day(i: usize) -> DateTime<Utc> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    start + Duration::days((i % 365) as i64) + Duration::minutes((i % 600) as i64)
}

fn records(
    size: usize,
) -> (
    Vec<ReservationRecord>,
    Vec<ExpenseRecord>,
    Vec<MaintenanceRecord>,
) {
    let per_source = size / 3;
    let reservations = (0..per_source)
        .map(|i| ReservationRecord {
            id: format!("r-{}", i),
            created_at: Some(day(i)),
            total_amount: Some(Decimal::new(10_000 + (i as i64 % 500) * 25, 2)),
            model: Some("Toyota Corolla".to_string()),
            ..Default::default()
        })
        .collect();
    let expenses = (0..per_source)
        .map(|i| ExpenseRecord {
            id: format!("e-{}", i),
            title: Some(format!("Expense {}", i)),
            amount: Some(Decimal::new(1_000 + (i as i64 % 300) * 10, 2)),
            created_at: Some(day(i * 7)),
            category_name: Some(CATEGORIES[i % CATEGORIES.len()].to_string()),
            ..Default::default()
        })
        .collect();
    let maintenance = (0..per_source)
        .map(|i| MaintenanceRecord {
            id: format!("m-{}", i),
            completed_date: Some(day(i * 3)),
            description: Some("Oil change".to_string()),
            cost: Some(Decimal::new(4_500, 2)),
            is_completed: i % 4 != 0,
            ..Default::default()
        })
        .collect();
    (reservations, expenses, maintenance)
}

fn transactions(size: usize) -> Vec<Transaction> {
    let (reservations, expenses, maintenance) = records(size);
    adapt_sources(&reservations, &expenses, &maintenance).transactions
}

fn first_half_of_2024() -> TransactionFilter {
    let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    TransactionFilter::new(DateRange::new(from, to).unwrap())
}

/// Adapt raw records of the three sources
#[divan::bench(args = SIZES)]
fn adapt(bencher: Bencher, size: usize) {
    let (reservations, expenses, maintenance) = records(size);
    bencher.bench_local(|| adapt_sources(&reservations, &expenses, &maintenance));
}

/// Filter on a six month range
#[divan::bench(args = SIZES)]
fn filter(bencher: Bencher, size: usize) {
    let transactions = transactions(size);
    let filter = first_half_of_2024();
    bencher.bench_local(|| filter_transactions(&transactions, &filter));
}

/// Category breakdown, monthly trend, top five and cash flow summary
#[divan::bench(args = SIZES)]
fn aggregate(bencher: Bencher, size: usize) {
    let transactions = transactions(size);
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    bencher.bench_local(|| {
        (
            category_breakdown(&transactions),
            monthly_trend(&transactions, now, 6),
            top_outflows(&transactions, 5),
            summarize(&transactions),
        )
    });
}

/// Sorted, quoted CSV export
#[divan::bench(args = SIZES)]
fn export(bencher: Bencher, size: usize) {
    let transactions = transactions(size);
    bencher.bench_local(|| to_delimited_text(&transactions).expect("Export failed"));
}
