//! Fleet Reports Library
//! # Overview
//!
//! This library builds cash flow reports for a rental agency from three
//! independently shaped sources: reservations (revenue), expenses and
//! maintenance costs.
//!
//! # Architecture
//!
//! The report is a pure pipeline, `adapt -> filter -> aggregate -> export`,
//! behind a single async boundary where the sources are fetched:
//!
//! - [`types`] - Core data types (Transaction, raw records, report results, errors)
//! - [`core`] - Business logic components:
//!   - [`core::adapter`] - Raw records to normalized transactions
//!   - [`core::filter`] - Date range, category, source and flow predicates
//!   - [`core::aggregator`] - Category breakdown, monthly trend, top expenses
//!   - [`core::cash_flow`] - Inflow, outflow and net totals
//!   - [`core::engine`] - Concurrent fetch and pipeline orchestration
//! - [`io`] - CSV export, JSON file sources, text and JSON rendering
//! - [`config`] - Layered configuration (file, environment, CLI)
//! - [`cli`] - CLI arguments parsing
//!
//! # Sources
//!
//! - **Reservation**: revenue, always an inflow in the `Revenue` category
//! - **Expense**: an outflow in its own category, `Uncategorized` when absent
//! - **Maintenance**: an outflow in the `Maintenance` category, only once
//!   completed and with a positive cost
//!
//! # Failures
//!
//! Records that do not decode, or miss a date or amount, are skipped and
//! reported as [`AdaptationFailure`]s next to the result. An invalid range, or a source
//! that fails or times out, aborts the whole report with a [`ReportError`].

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod types;

pub use crate::config::ReportConfig;
pub use crate::core::{
    CategoryFilter, ExpenseRepository, MaintenanceRepository, ReportEngine, ReportPeriod,
    ReservationRepository, TransactionFilter,
};
pub use crate::io::{export_report, to_delimited_text, JsonDirectorySource};
pub use crate::types::{
    AdaptationFailure, CashFlowSummary, CategoryAggregate, DateRange, FailureKind, FlowType,
    MonthlyAggregate, ReportError, ReportResult, SourceKind, SourceRecord, Transaction,
};
