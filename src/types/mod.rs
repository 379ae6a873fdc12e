//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: The normalized transaction and its enums
//! - `records`: Raw records served by the backend
//! - `range`: Inclusive calendar date ranges
//! - `report`: Derived aggregates and the report result
//! - `error`: Error types for the reports engine

pub mod error;
pub mod range;
pub mod records;
pub mod report;
pub mod transaction;

pub use error::{AdaptationFailure, FailureKind, ReportError, ReportStage, SourceError};
pub use range::DateRange;
pub use records::{
    ExpenseRecord, InvoiceRecord, MaintenanceRecord, ReservationRecord, SourceRecord,
};
pub use report::{
    CashFlowSummary, CategoryAggregate, FlowStatistics, MonthKey, MonthlyAggregate, ReportResult,
};
pub use transaction::{
    AgencyId, FlowType, RecordId, SourceKind, Transaction, TransactionKey, DEFAULT_CATEGORY,
    MAX_AMOUNT,
};
