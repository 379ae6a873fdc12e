//! Aggregator
//!
//! Pure grouping operations over an already filtered transaction list:
//! - `category_breakdown` - totals per category with their share of the whole
//! - `monthly_trend` - totals per calendar month over a trailing window
//! - `top_outflows` - largest outflows, ties kept in input order
//! - `flow_statistics` - count, total, average and largest of one flow

use std::collections::BTreeMap;

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;

use crate::types::{
    CategoryAggregate, FlowStatistics, FlowType, MonthKey, MonthlyAggregate, Transaction,
};

/// Default number of entries returned by [`top_outflows`]
pub const DEFAULT_TOP_N: usize = 5;

/// Default length of the trailing window used by [`monthly_trend`]
pub const DEFAULT_TREND_MONTHS: u32 = 6;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Group by category and sum, largest total first
///
/// Categories with equal totals are ordered by name so the result does not
/// depend on input order. Percentages are 0 for every group when the grand
/// total is 0.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryAggregate> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.category()).or_insert(Decimal::ZERO) += tx.amount();
    }

    let grand_total: Decimal = totals.values().copied().sum();

    let mut breakdown: Vec<CategoryAggregate> = totals
        .into_iter()
        .map(|(category, total_amount)| CategoryAggregate {
            category: category.to_string(),
            total_amount,
            percentage_of_total: percentage(total_amount, grand_total),
        })
        .collect();

    // BTreeMap iteration is by name; the stable sort keeps that for ties
    breakdown.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    breakdown
}

/// Sum per calendar month over the `months` months ending at `now`, oldest first
///
/// The window is `[now - months, now]`, both ends included. Months without
/// transactions are omitted rather than reported as zero.
pub fn monthly_trend(
    transactions: &[Transaction],
    now: DateTime<Utc>,
    months: u32,
) -> Vec<MonthlyAggregate> {
    let window_start = now
        .checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut buckets: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    for tx in transactions {
        if tx.date() < window_start || tx.date() > now {
            continue;
        }
        *buckets.entry(MonthKey::of(tx.date())).or_insert(Decimal::ZERO) += tx.amount();
    }

    buckets
        .into_iter()
        .map(|(month_key, total_amount)| MonthlyAggregate {
            month_key,
            total_amount,
        })
        .collect()
}

/// The `n` largest outflows, largest first
///
/// Equal amounts keep their input order.
pub fn top_outflows(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut outflows: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.flow() == FlowType::Outflow)
        .collect();

    outflows.sort_by(|a, b| b.amount().cmp(&a.amount()));
    outflows.into_iter().take(n).cloned().collect()
}

/// Summary statistics of the transactions moving in direction `flow`
pub fn flow_statistics(transactions: &[Transaction], flow: FlowType) -> FlowStatistics {
    let mut count = 0usize;
    let mut total = Decimal::ZERO;
    let mut largest = Decimal::ZERO;

    for tx in transactions.iter().filter(|tx| tx.flow() == flow) {
        count += 1;
        total += tx.amount();
        largest = largest.max(tx.amount());
    }

    let average = if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    };

    FlowStatistics {
        flow,
        count,
        total,
        average,
        largest,
    }
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    // part <= whole, so the quotient never exceeds one
    part / whole * ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceKind, MAX_AMOUNT};
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn tx(source: SourceKind, id: &str, date: DateTime<Utc>, amount: i64, category: &str) -> Transaction {
        Transaction::new(source, id, date, Decimal::new(amount, 0))
            .unwrap()
            .with_category(category)
    }

    /// January scenario: one reservation, one fuel expense, one maintenance
    fn january() -> Vec<Transaction> {
        vec![
            tx(SourceKind::Reservation, "r-1", at(2024, 1, 5), 500, "Revenue"),
            tx(SourceKind::Expense, "e-1", at(2024, 1, 20), 120, "Fuel"),
            tx(SourceKind::Maintenance, "m-1", at(2024, 1, 25), 80, "Maintenance"),
        ]
    }

    #[test]
    fn test_category_breakdown_sorted_with_percentages() {
        let breakdown = category_breakdown(&january());

        let summary: Vec<(&str, Decimal, Decimal)> = breakdown
            .iter()
            .map(|agg| {
                (
                    agg.category.as_str(),
                    agg.total_amount,
                    agg.percentage_of_total.round_dp(1),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Revenue", Decimal::new(500, 0), Decimal::new(714, 1)),
                ("Fuel", Decimal::new(120, 0), Decimal::new(171, 1)),
                ("Maintenance", Decimal::new(80, 0), Decimal::new(114, 1)),
            ]
        );
    }

    #[test]
    fn test_category_percentages_sum_to_one_hundred() {
        let mut transactions = january();
        transactions.push(tx(SourceKind::Expense, "e-2", at(2024, 1, 21), 33, "Tolls"));
        transactions.push(tx(SourceKind::Expense, "e-3", at(2024, 1, 22), 7, "Fuel"));

        let sum: Decimal = category_breakdown(&transactions)
            .iter()
            .map(|agg| agg.percentage_of_total)
            .sum();

        assert!((sum - ONE_HUNDRED).abs() <= Decimal::new(1, 1));
    }

    #[test]
    fn test_category_breakdown_at_amount_bound() {
        let transactions: Vec<Transaction> = (0..1_000)
            .map(|i| {
                Transaction::new(SourceKind::Expense, format!("e-{}", i), at(2024, 1, 5), MAX_AMOUNT)
                    .unwrap()
                    .with_category(if i % 4 == 0 { "Fuel" } else { "Tolls" })
            })
            .collect();

        let breakdown = category_breakdown(&transactions);

        assert_eq!(breakdown[0].category, "Tolls");
        assert_eq!(breakdown[0].total_amount, MAX_AMOUNT * Decimal::from(750));
        assert_eq!(breakdown[0].percentage_of_total, Decimal::from(75));
        assert_eq!(breakdown[1].percentage_of_total, Decimal::from(25));
        assert_eq!(
            flow_statistics(&transactions, FlowType::Outflow).total,
            MAX_AMOUNT * Decimal::from(1_000)
        );
    }

    #[test]
    fn test_category_breakdown_zero_total_gives_zero_percent() {
        let transactions = vec![
            tx(SourceKind::Expense, "e-1", at(2024, 1, 1), 0, "Fuel"),
            tx(SourceKind::Expense, "e-2", at(2024, 1, 2), 0, "Tolls"),
        ];

        let breakdown = category_breakdown(&transactions);

        assert_eq!(breakdown.len(), 2);
        assert!(breakdown.iter().all(|agg| agg.percentage_of_total.is_zero()));
    }

    #[test]
    fn test_category_breakdown_order_independent_of_input() {
        let mut reversed = january();
        reversed.push(tx(SourceKind::Expense, "e-2", at(2024, 1, 21), 80, "Cleaning"));
        let forward = reversed.clone();
        reversed.reverse();

        assert_eq!(category_breakdown(&forward), category_breakdown(&reversed));
    }

    #[test]
    fn test_monthly_trend_is_sparse_and_ascending() {
        let now = at(2024, 6, 15);
        let transactions = vec![
            tx(SourceKind::Reservation, "r-1", at(2024, 6, 1), 100, "Revenue"),
            tx(SourceKind::Reservation, "r-2", at(2024, 1, 20), 40, "Revenue"),
            tx(SourceKind::Expense, "e-1", at(2024, 6, 2), 25, "Fuel"),
            tx(SourceKind::Expense, "e-2", at(2024, 3, 9), 10, "Fuel"),
            // before the window
            tx(SourceKind::Expense, "e-3", at(2023, 12, 14), 999, "Fuel"),
            // after now
            tx(SourceKind::Expense, "e-4", at(2024, 6, 20), 999, "Fuel"),
        ];

        let trend = monthly_trend(&transactions, now, DEFAULT_TREND_MONTHS);
        let rendered: Vec<(String, Decimal)> = trend
            .iter()
            .map(|agg| (agg.month_key.to_string(), agg.total_amount))
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("2024-01".to_string(), Decimal::new(40, 0)),
                ("2024-03".to_string(), Decimal::new(10, 0)),
                ("2024-06".to_string(), Decimal::new(125, 0)),
            ]
        );
    }

    #[test]
    fn test_monthly_trend_window_start_is_inclusive() {
        let now = at(2024, 6, 15);
        let transactions = vec![tx(SourceKind::Expense, "e-1", at(2023, 12, 15), 5, "Fuel")];

        let trend = monthly_trend(&transactions, now, 6);

        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].month_key.to_string(), "2023-12");
    }

    #[test]
    fn test_top_outflows_ignores_inflows_and_keeps_tie_order() {
        let transactions = vec![
            tx(SourceKind::Reservation, "r-1", at(2024, 1, 1), 1000, "Revenue"),
            tx(SourceKind::Expense, "e-1", at(2024, 1, 2), 50, "Fuel"),
            tx(SourceKind::Expense, "e-2", at(2024, 1, 3), 70, "Fuel"),
            tx(SourceKind::Maintenance, "m-1", at(2024, 1, 4), 50, "Maintenance"),
            tx(SourceKind::Expense, "e-3", at(2024, 1, 5), 50, "Tolls"),
        ];

        let top = top_outflows(&transactions, 3);
        let ids: Vec<&str> = top.iter().map(|tx| tx.id()).collect();

        assert_eq!(ids, vec!["e-2", "e-1", "m-1"]);
    }

    #[rstest]
    #[case::fewer_than_n(10, 2)]
    #[case::zero(0, 0)]
    #[case::default(DEFAULT_TOP_N, 2)]
    fn test_top_outflows_length(#[case] n: usize, #[case] expected: usize) {
        assert_eq!(top_outflows(&january(), n).len(), expected);
    }

    #[test]
    fn test_flow_statistics() {
        let stats = flow_statistics(&january(), FlowType::Outflow);

        assert_eq!(stats.flow, FlowType::Outflow);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total, Decimal::new(200, 0));
        assert_eq!(stats.average, Decimal::new(100, 0));
        assert_eq!(stats.largest, Decimal::new(120, 0));
    }

    #[test]
    fn test_flow_statistics_empty() {
        let stats = flow_statistics(&[], FlowType::Inflow);

        assert_eq!(stats.count, 0);
        assert!(stats.total.is_zero());
        assert!(stats.average.is_zero());
        assert!(stats.largest.is_zero());
    }
}
