//! Cash-flow calculator

use rust_decimal::Decimal;

use crate::types::{CashFlowSummary, FlowType, Transaction};

/// Reduce transactions to inflow, outflow and signed net totals
///
/// The net is always `total_inflows - total_outflows`; a negative value is a
/// deficit and is returned as such.
pub fn summarize(transactions: &[Transaction]) -> CashFlowSummary {
    let (total_inflows, total_outflows) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(inflows, outflows), tx| match tx.flow() {
            FlowType::Inflow => (inflows + tx.amount(), outflows),
            FlowType::Outflow => (inflows, outflows + tx.amount()),
        },
    );

    CashFlowSummary {
        total_inflows,
        total_outflows,
        net_cash_flow: total_inflows - total_outflows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn tx(source: SourceKind, id: &str, amount: Decimal) -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        Transaction::new(source, id, date, amount).unwrap()
    }

    #[test]
    fn test_january_scenario() {
        let transactions = vec![
            tx(SourceKind::Reservation, "r-1", Decimal::new(500, 0)),
            tx(SourceKind::Expense, "e-1", Decimal::new(120, 0)),
            tx(SourceKind::Maintenance, "m-1", Decimal::new(80, 0)),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.total_inflows, Decimal::new(500, 0));
        assert_eq!(summary.total_outflows, Decimal::new(200, 0));
        assert_eq!(summary.net_cash_flow, Decimal::new(300, 0));
        assert!(!summary.is_deficit());
    }

    #[rstest]
    #[case::surplus(Decimal::new(1000, 2), Decimal::new(333, 2), Decimal::new(667, 2))]
    #[case::deficit(Decimal::new(1, 1), Decimal::new(3, 1), Decimal::new(-2, 1))]
    #[case::break_even(Decimal::new(4250, 2), Decimal::new(4250, 2), Decimal::ZERO)]
    fn test_net_is_exact_and_signed(
        #[case] inflow: Decimal,
        #[case] outflow: Decimal,
        #[case] expected_net: Decimal,
    ) {
        let transactions = vec![
            tx(SourceKind::Reservation, "r-1", inflow),
            tx(SourceKind::Expense, "e-1", outflow),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.net_cash_flow, expected_net);
        assert_eq!(
            summary.net_cash_flow,
            summary.total_inflows - summary.total_outflows
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize(&[]), CashFlowSummary::default());
    }
}
