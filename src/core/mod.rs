//! Core report logic
//!
//! This module contains the report pipeline components:
//! - `adapter` - Raw source records to normalized transactions
//! - `filter` - Date range, category, source and flow predicates
//! - `aggregator` - Category breakdown, monthly trend, top-N, flow statistics
//! - `cash_flow` - Inflow, outflow and net totals
//! - `period` - Preset report periods
//! - `traits` - Repository abstractions for the three sources
//! - `engine` - Pipeline orchestration over the repositories

pub mod adapter;
pub mod aggregator;
pub mod cash_flow;
pub mod engine;
pub mod filter;
pub mod period;
pub mod traits;

pub use adapter::{adapt, adapt_sources, Adapt, AdapterOutput};
pub use aggregator::{category_breakdown, flow_statistics, monthly_trend, top_outflows};
pub use cash_flow::summarize;
pub use engine::ReportEngine;
pub use filter::{filter_transactions, CategoryFilter, TransactionFilter};
pub use period::ReportPeriod;
pub use traits::{ExpenseRepository, MaintenanceRepository, ReservationRepository};
