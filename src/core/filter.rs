//! Filter engine
//!
//! Narrows a transaction collection by date range, category, source and flow.
//! Filtering is pure and stable: the output keeps the relative order of the
//! input.

use crate::types::{DateRange, FlowType, SourceKind, Transaction};

/// Sentinel accepted in place of a category name to disable the filter
pub const ALL_CATEGORIES: &str = "all";

/// Category predicate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category passes
    #[default]
    All,
    /// Only this exact label passes (case-sensitive)
    Exact(String),
}

impl CategoryFilter {
    /// Build a filter from an optional user-supplied value
    ///
    /// `None`, a blank string and `"all"` (any case) all disable the filter.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => CategoryFilter::All,
            Some(value) if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) => {
                CategoryFilter::All
            }
            Some(value) => CategoryFilter::Exact(value.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(expected) => expected == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::parse(Some(value))
    }
}

/// Combined predicate applied by [`filter_transactions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive date bounds (end normalized to end of day)
    pub range: DateRange,
    pub category: CategoryFilter,
    /// Restrict to one source collection
    pub source: Option<SourceKind>,
    /// Restrict to one direction of cash movement
    pub flow: Option<FlowType>,
}

impl TransactionFilter {
    /// Filter on the date range only
    pub fn new(range: DateRange) -> Self {
        TransactionFilter {
            range,
            category: CategoryFilter::All,
            source: None,
            flow: None,
        }
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_source(mut self, source: Option<SourceKind>) -> Self {
        self.source = source;
        self
    }

    pub fn with_flow(mut self, flow: Option<FlowType>) -> Self {
        self.flow = flow;
        self
    }

    /// Whether a single transaction passes every predicate
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.range.contains(tx.date())
            && self.category.matches(tx.category())
            && self.source.map_or(true, |source| tx.source() == source)
            && self.flow.map_or(true, |flow| tx.flow() == flow)
    }
}

/// Return the transactions passing `filter`, in input order
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect()
}
