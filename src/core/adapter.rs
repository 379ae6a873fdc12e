//! Source adapters
//!
//! One adapter per source kind maps a raw backend record into a normalized
//! [`Transaction`]. Adapters never invent values: a record lacking its date or
//! amount becomes an [`AdaptationFailure`] rather than a zero-valued
//! transaction, because a silent zero would corrupt every aggregate built on
//! top of it.
//!
//! # Outcomes per record
//!
//! - `Ok(Some(tx))` - adapted
//! - `Ok(None)` - not eligible (maintenance that is not completed or has no
//!   cost); excluded without being an error
//! - `Err(failure)` - a required field is missing or invalid, or the payload
//!   element never decoded into a record ([`SourceRecord::Malformed`])

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::types::{
    AdaptationFailure, ExpenseRecord, FailureKind, MaintenanceRecord, ReservationRecord,
    SourceKind, SourceRecord, Transaction,
};

/// Category of every reservation transaction
pub const REVENUE_CATEGORY: &str = "Revenue";

/// Category of every maintenance transaction
pub const MAINTENANCE_CATEGORY: &str = "Maintenance";

/// Per-source mapping into a [`Transaction`]
pub trait Adapt {
    /// Collection records of this type come from
    const SOURCE: SourceKind;

    /// Backend record type, `Self` for the plain records
    type Record;

    /// Identifier used when reporting a failure
    fn record_id(&self) -> &str;

    /// Map the record, see the module docs for the meaning of each outcome
    fn to_transaction(&self) -> Result<Option<Transaction>, FailureKind>;
}

impl Adapt for ReservationRecord {
    type Record = Self;

    const SOURCE: SourceKind = SourceKind::Reservation;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_transaction(&self) -> Result<Option<Transaction>, FailureKind> {
        let date = self
            .created_at
            .or(self.start_date)
            .ok_or_else(|| FailureKind::missing_field("createdAt"))?;

        let amount = self
            .total_amount
            .or_else(|| self.invoice.as_ref().and_then(|invoice| invoice.total_amount))
            .ok_or_else(|| FailureKind::missing_field("totalAmount"))?;

        let car = non_blank(&self.model).or_else(|| non_blank(&self.car_license_plate));
        let description = match car {
            Some(car) => format!("Reservation - {}", car),
            None => "Reservation".to_string(),
        };

        let tx = Transaction::new(Self::SOURCE, self.id.as_str(), date, amount)?
            .with_description(description)
            .with_category(REVENUE_CATEGORY);
        Ok(Some(tx))
    }
}

impl Adapt for ExpenseRecord {
    type Record = Self;

    const SOURCE: SourceKind = SourceKind::Expense;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_transaction(&self) -> Result<Option<Transaction>, FailureKind> {
        let date = self
            .created_at
            .ok_or_else(|| FailureKind::missing_field("createdAt"))?;
        let amount = self
            .amount
            .ok_or_else(|| FailureKind::missing_field("amount"))?;

        let mut tx = Transaction::new(Self::SOURCE, self.id.as_str(), date, amount)?
            .with_description(self.title.clone().unwrap_or_default());
        if let Some(category) = non_blank(&self.category_name) {
            tx = tx.with_category(category);
        }
        Ok(Some(tx))
    }
}

impl Adapt for MaintenanceRecord {
    type Record = Self;

    const SOURCE: SourceKind = SourceKind::Maintenance;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_transaction(&self) -> Result<Option<Transaction>, FailureKind> {
        if !self.is_completed {
            return Ok(None);
        }
        let cost = match self.cost {
            Some(cost) if cost > Decimal::ZERO => cost,
            _ => return Ok(None),
        };

        let date = self
            .completed_date
            .or(self.scheduled_date)
            .ok_or_else(|| FailureKind::missing_field("completedDate"))?;

        let description = match non_blank(&self.description) {
            Some(description) => format!("Maintenance - {}", description),
            None => "Maintenance".to_string(),
        };

        let tx = Transaction::new(Self::SOURCE, self.id.as_str(), date, cost)?
            .with_description(description)
            .with_category(MAINTENANCE_CATEGORY);
        Ok(Some(tx))
    }
}

impl<R: Adapt> Adapt for SourceRecord<R> {
    type Record = R::Record;

    const SOURCE: SourceKind = R::SOURCE;

    fn record_id(&self) -> &str {
        match self {
            SourceRecord::Valid(record) => record.record_id(),
            SourceRecord::Malformed { record_id, .. } => record_id,
        }
    }

    fn to_transaction(&self) -> Result<Option<Transaction>, FailureKind> {
        match self {
            SourceRecord::Valid(record) => record.to_transaction(),
            SourceRecord::Malformed { reason, .. } => Err(FailureKind::undecodable(reason.as_str())),
        }
    }
}

/// Adapt one record, tagging any failure with its source and id
pub fn adapt<R: Adapt>(record: &R) -> Result<Option<Transaction>, AdaptationFailure> {
    record
        .to_transaction()
        .map_err(|kind| AdaptationFailure::new(R::SOURCE, record.record_id(), kind))
}

/// Result of adapting one or more source collections
///
/// Failures are kept, never dropped: callers surface their count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterOutput {
    /// Successfully adapted transactions, in input order
    pub transactions: Vec<Transaction>,
    /// Records rejected for a missing or invalid required field
    pub failures: Vec<AdaptationFailure>,
    /// Records excluded as not eligible (not an error)
    pub ineligible: usize,
}

impl AdapterOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapt every record of one collection, appending to this output
    pub fn extend_from<R: Adapt>(&mut self, records: &[R]) {
        for record in records {
            match adapt(record) {
                Ok(Some(tx)) => self.transactions.push(tx),
                Ok(None) => {
                    debug!(
                        source = %R::SOURCE,
                        record = record.record_id(),
                        "record not eligible for the report"
                    );
                    self.ineligible += 1;
                }
                Err(failure) => {
                    warn!(%failure, "record excluded from the report");
                    self.failures.push(failure);
                }
            }
        }
    }
}

/// Adapt the three source collections into one output
///
/// Accepts plain records or fetched [`SourceRecord`]s. Transactions keep
/// source order: reservations, then expenses, then maintenance, each in its
/// input order.
pub fn adapt_sources<R, E, M>(reservations: &[R], expenses: &[E], maintenance: &[M]) -> AdapterOutput
where
    R: Adapt<Record = ReservationRecord>,
    E: Adapt<Record = ExpenseRecord>,
    M: Adapt<Record = MaintenanceRecord>,
{
    let mut output = AdapterOutput::new();
    output.extend_from(reservations);
    output.extend_from(expenses);
    output.extend_from(maintenance);
    output
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
