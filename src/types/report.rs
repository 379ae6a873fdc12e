//! Derived report types
//!
//! Everything here is computed fresh for one report invocation and discarded
//! once the caller has consumed it. Nothing is cached across calls.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::error::AdaptationFailure;
use super::range::DateRange;
use super::transaction::{AgencyId, FlowType, Transaction};

/// Total for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    pub category: String,
    pub total_amount: Decimal,
    /// Share of the grand total, in percent (0 when the grand total is 0)
    pub percentage_of_total: Decimal,
}

/// Calendar month bucket (`YYYY-MM`)
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Month containing `instant` (UTC)
    pub fn of(instant: DateTime<Utc>) -> Self {
        MonthKey {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Total for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub month_key: MonthKey,
    pub total_amount: Decimal,
}

/// Inflow, outflow and signed net totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub total_inflows: Decimal,
    pub total_outflows: Decimal,
    /// `total_inflows - total_outflows`; negative means a deficit
    pub net_cash_flow: Decimal,
}

impl CashFlowSummary {
    pub fn is_deficit(&self) -> bool {
        self.net_cash_flow < Decimal::ZERO
    }
}

/// Count, total, average and largest amount of one flow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStatistics {
    pub flow: FlowType,
    pub count: usize,
    pub total: Decimal,
    /// Zero when `count` is zero
    pub average: Decimal,
    /// Zero when `count` is zero
    pub largest: Decimal,
}

/// Complete output of one report run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub agency_id: AgencyId,
    pub range: DateRange,
    /// The "now" the trailing monthly window was anchored on
    pub generated_at: DateTime<Utc>,
    /// Filtered transactions, in source order (reservations, expenses, maintenance)
    pub transactions: Vec<Transaction>,
    pub category_breakdown: Vec<CategoryAggregate>,
    pub monthly_trend: Vec<MonthlyAggregate>,
    pub top_expenses: Vec<Transaction>,
    pub cash_flow_summary: CashFlowSummary,
    pub outflow_statistics: FlowStatistics,
    pub adaptation_failures: Vec<AdaptationFailure>,
    /// Maintenance records left out because they were not completed or had no cost
    pub ineligible_records: usize,
}

impl ReportResult {
    /// Inflow transactions, most recent first
    pub fn inflows(&self) -> Vec<&Transaction> {
        self.by_flow(FlowType::Inflow)
    }

    /// Outflow transactions, most recent first
    pub fn outflows(&self) -> Vec<&Transaction> {
        self.by_flow(FlowType::Outflow)
    }

    /// Number of records that could not be adapted
    pub fn failure_count(&self) -> usize {
        self.adaptation_failures.len()
    }

    /// Whether the data loaded but some records were skipped
    pub fn has_skipped_records(&self) -> bool {
        !self.adaptation_failures.is_empty()
    }

    fn by_flow(&self, flow: FlowType) -> Vec<&Transaction> {
        let mut selected: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.flow() == flow)
            .collect();
        // Stable: equal dates keep source order
        selected.sort_by(|a, b| b.date().cmp(&a.date()));
        selected
    }
}
