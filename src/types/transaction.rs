//! Transaction-related types for the fleet reports engine
//!
//! This module defines the normalized transaction produced by the source
//! adapters, together with the enums describing where a transaction came from
//! and in which direction the money moved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::FailureKind;

/// Agency (tenant) identifier
///
/// Opaque string as served by the backend (usually a GUID).
pub type AgencyId = String;

/// Record identifier
///
/// Unique within one source collection only; combine with [`SourceKind`]
/// (see [`Transaction::key`]) for a key that is unique across sources.
pub type RecordId = String;

/// Category assigned when the source record carries none
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Largest amount a single transaction may carry (10^15)
///
/// Keeps report-wide sums far below the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// External collection a transaction was adapted from
///
/// The declaration order is also the tie-break order used by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Reservation revenue
    Reservation,
    /// Agency expense
    Expense,
    /// Completed maintenance cost
    Maintenance,
}

impl SourceKind {
    /// All source kinds, in fetch and adaptation order
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Reservation,
        SourceKind::Expense,
        SourceKind::Maintenance,
    ];

    /// Direction of cash movement for every transaction of this source
    ///
    /// Revenue is the only inflow; expenses and maintenance costs are outflows.
    pub fn flow(self) -> FlowType {
        match self {
            SourceKind::Reservation => FlowType::Inflow,
            SourceKind::Expense | SourceKind::Maintenance => FlowType::Outflow,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Reservation => "reservation",
            SourceKind::Expense => "expense",
            SourceKind::Maintenance => "maintenance",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "reservation" | "reservations" => Ok(SourceKind::Reservation),
            "expense" | "expenses" => Ok(SourceKind::Expense),
            "maintenance" | "maintenances" => Ok(SourceKind::Maintenance),
            other => Err(format!("Invalid source: '{}'", other)),
        }
    }
}

/// Direction of cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FlowType {
    /// Money received by the agency
    Inflow,
    /// Money spent by the agency
    Outflow,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowType::Inflow => f.write_str("Inflow"),
            FlowType::Outflow => f.write_str("Outflow"),
        }
    }
}

impl FromStr for FlowType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "inflow" | "in" => Ok(FlowType::Inflow),
            "outflow" | "out" => Ok(FlowType::Outflow),
            other => Err(format!("Invalid flow: '{}'", other)),
        }
    }
}

/// Globally unique transaction key: (source, id)
pub type TransactionKey = (SourceKind, RecordId);

/// Normalized cash movement
///
/// A transaction is immutable once built: fields are private and only the
/// consuming `with_*` builders exist. The amount is never negative; the sign
/// is carried by [`FlowType`], which is derived from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: RecordId,
    date: DateTime<Utc>,
    description: String,
    amount: Decimal,
    category: String,
    #[serde(rename = "type")]
    flow: FlowType,
    source: SourceKind,
}

impl Transaction {
    /// Create a transaction with an empty description and the default category
    ///
    /// # Errors
    ///
    /// Returns [`FailureKind::InvalidAmount`] if `amount` is negative or above
    /// [`MAX_AMOUNT`].
    pub fn new(
        source: SourceKind,
        id: impl Into<RecordId>,
        date: DateTime<Utc>,
        amount: Decimal,
    ) -> Result<Self, FailureKind> {
        if amount < Decimal::ZERO || amount > MAX_AMOUNT {
            return Err(FailureKind::invalid_amount(amount));
        }

        Ok(Transaction {
            id: id.into(),
            date,
            description: String::new(),
            amount,
            category: DEFAULT_CATEGORY.to_string(),
            flow: source.flow(),
            source,
        })
    }

    /// Replace the display description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the category label
    ///
    /// Blank labels keep the default category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !category.trim().is_empty() {
            self.category = category;
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn flow(&self) -> FlowType {
        self.flow
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Key that is unique across all three sources
    pub fn key(&self) -> TransactionKey {
        (self.source, self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap()
    }

    #[rstest]
    #[case::reservation(SourceKind::Reservation, FlowType::Inflow)]
    #[case::expense(SourceKind::Expense, FlowType::Outflow)]
    #[case::maintenance(SourceKind::Maintenance, FlowType::Outflow)]
    fn test_flow_is_derived_from_source(#[case] source: SourceKind, #[case] expected: FlowType) {
        let tx = Transaction::new(source, "1", instant(), Decimal::new(100, 0)).unwrap();
        assert_eq!(tx.flow(), expected);
        assert_eq!(tx.source(), source);
    }

    #[test]
    fn test_new_uses_default_category_and_empty_description() {
        let tx = Transaction::new(SourceKind::Expense, "e-1", instant(), Decimal::ONE).unwrap();
        assert_eq!(tx.category(), DEFAULT_CATEGORY);
        assert_eq!(tx.description(), "");
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let result = Transaction::new(SourceKind::Expense, "e-1", instant(), Decimal::new(-5, 0));
        assert_eq!(
            result.unwrap_err(),
            FailureKind::InvalidAmount {
                amount: Decimal::new(-5, 0)
            }
        );
    }

    #[test]
    fn test_max_amount_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000i64));
    }

    #[rstest]
    #[case::at_bound(MAX_AMOUNT, true)]
    #[case::above_bound(MAX_AMOUNT + Decimal::new(1, 2), false)]
    #[case::near_decimal_max(Decimal::from_i128_with_scale(10i128.pow(27), 0), false)]
    fn test_amount_upper_bound(#[case] amount: Decimal, #[case] accepted: bool) {
        let result = Transaction::new(SourceKind::Expense, "e-1", instant(), amount);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert_eq!(result.unwrap_err(), FailureKind::invalid_amount(amount));
        }
    }

    #[test]
    fn test_zero_amount_is_accepted() {
        let tx = Transaction::new(SourceKind::Reservation, "r-1", instant(), Decimal::ZERO);
        assert!(tx.is_ok());
    }

    #[test]
    fn test_blank_category_keeps_default() {
        let tx = Transaction::new(SourceKind::Expense, "e-1", instant(), Decimal::ONE)
            .unwrap()
            .with_category("   ");
        assert_eq!(tx.category(), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_key_combines_source_and_id() {
        let reservation =
            Transaction::new(SourceKind::Reservation, "42", instant(), Decimal::ONE).unwrap();
        let expense = Transaction::new(SourceKind::Expense, "42", instant(), Decimal::ONE).unwrap();

        assert_ne!(reservation.key(), expense.key());
        assert_eq!(reservation.key(), (SourceKind::Reservation, "42".to_string()));
    }

    #[rstest]
    #[case("reservation", SourceKind::Reservation)]
    #[case("Expenses", SourceKind::Expense)]
    #[case(" maintenance ", SourceKind::Maintenance)]
    fn test_source_kind_parsing(#[case] input: &str, #[case] expected: SourceKind) {
        assert_eq!(input.parse::<SourceKind>().unwrap(), expected);
    }

    #[test]
    fn test_invalid_flow_parsing() {
        let result = "sideways".parse::<FlowType>();
        assert!(result.unwrap_err().contains("Invalid flow"));
    }
}
