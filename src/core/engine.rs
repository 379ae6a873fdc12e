//! Report engine
//!
//! This module provides the ReportEngine that runs the report pipeline for one
//! agency:
//!
//! ```text
//! validate range -> fetch (3 sources, concurrent) -> adapt -> filter
//!                -> aggregate + cash flow -> ReportResult
//! ```
//!
//! The engine enforces these rules:
//! - An invalid range is rejected before any source is contacted
//! - All three fetches complete (or fail, or time out) before adaptation starts;
//!   a single failure aborts the report with no partial result
//! - A timeout is reported as [`ReportError::SourceTimedOut`], never as an
//!   empty collection
//! - Records that fail decoding or adaptation are returned alongside the
//!   result; they never make a source unavailable

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join3;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::core::adapter::adapt_sources;
use crate::core::aggregator::{category_breakdown, flow_statistics, monthly_trend, top_outflows};
use crate::core::cash_flow::summarize;
use crate::core::filter::{filter_transactions, CategoryFilter, TransactionFilter};
use crate::core::traits::{ExpenseRepository, MaintenanceRepository, ReservationRepository};
use crate::types::{
    DateRange, ExpenseRecord, FlowType, MaintenanceRecord, ReportError, ReportResult,
    ReservationRecord, SourceError, SourceKind, SourceRecord,
};

/// Report pipeline over three repositories
///
/// Holds no state between runs: every call fetches a fresh snapshot and builds
/// a new [`ReportResult`], so one engine can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ReportEngine<R, E, M> {
    reservations: R,
    expenses: E,
    maintenance: M,
    config: ReportConfig,
}

impl<S> ReportEngine<S, S, S>
where
    S: ReservationRepository + ExpenseRepository + MaintenanceRepository + Clone,
{
    /// Create an engine whose three repositories are served by one source
    pub fn from_source(source: S, config: ReportConfig) -> Self {
        ReportEngine::new(source.clone(), source.clone(), source, config)
    }
}

impl<R, E, M> ReportEngine<R, E, M>
where
    R: ReservationRepository,
    E: ExpenseRepository,
    M: MaintenanceRepository,
{
    /// Create a new ReportEngine
    ///
    /// # Arguments
    ///
    /// * `reservations` - Repository of revenue records
    /// * `expenses` - Repository of expense records
    /// * `maintenance` - Repository of maintenance records
    /// * `config` - Fetch timeout and aggregation sizes
    pub fn new(reservations: R, expenses: E, maintenance: M, config: ReportConfig) -> Self {
        ReportEngine {
            reservations,
            expenses,
            maintenance,
            config,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run a report for `agency_id` over `date_from..=date_to`
    ///
    /// The monthly trend is anchored on the current time.
    ///
    /// # Arguments
    ///
    /// * `agency_id` - Agency whose records are reported on
    /// * `date_from` - First day of the report (inclusive)
    /// * `date_to` - Last day of the report (inclusive, up to 23:59:59.999)
    /// * `category` - Category restriction, [`CategoryFilter::All`] for none
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `date_from` is after `date_to` (no fetch is attempted)
    /// - Any repository fails or exceeds the configured timeout
    pub async fn run_report(
        &self,
        agency_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        category: CategoryFilter,
    ) -> Result<ReportResult, ReportError> {
        let range = DateRange::new(date_from, date_to)?;
        let filter = TransactionFilter::new(range).with_category(category);
        self.run_report_at(agency_id, &filter, Utc::now()).await
    }

    /// Run a report with a full filter and an explicit "now"
    ///
    /// `now` anchors the trailing monthly trend window and is recorded as the
    /// result's `generated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::SourceUnavailable`] or
    /// [`ReportError::SourceTimedOut`] for the first failing source, in the
    /// order reservations, expenses, maintenance.
    pub async fn run_report_at(
        &self,
        agency_id: &str,
        filter: &TransactionFilter,
        now: DateTime<Utc>,
    ) -> Result<ReportResult, ReportError> {
        info!(
            agency = agency_id,
            from = %filter.range.from(),
            to = %filter.range.to(),
            "Running report"
        );

        let (reservations, expenses, maintenance) = self.fetch_all(agency_id).await?;

        let adapted = adapt_sources(&reservations, &expenses, &maintenance);
        info!(
            adapted = adapted.transactions.len(),
            failed = adapted.failures.len(),
            ineligible = adapted.ineligible,
            "Adapted source records"
        );

        let transactions = filter_transactions(&adapted.transactions, filter);
        info!(kept = transactions.len(), "Filtered transactions");

        Ok(ReportResult {
            agency_id: agency_id.to_string(),
            range: filter.range,
            generated_at: now,
            category_breakdown: category_breakdown(&transactions),
            monthly_trend: monthly_trend(&transactions, now, self.config.trend_months),
            top_expenses: top_outflows(&transactions, self.config.top_n),
            cash_flow_summary: summarize(&transactions),
            outflow_statistics: flow_statistics(&transactions, FlowType::Outflow),
            transactions,
            adaptation_failures: adapted.failures,
            ineligible_records: adapted.ineligible,
        })
    }

    /// Fetch the three collections concurrently and wait for all of them
    async fn fetch_all(
        &self,
        agency_id: &str,
    ) -> Result<
        (
            Vec<SourceRecord<ReservationRecord>>,
            Vec<SourceRecord<ExpenseRecord>>,
            Vec<SourceRecord<MaintenanceRecord>>,
        ),
        ReportError,
    > {
        let timeout = self.config.fetch_timeout();

        let (reservations, expenses, maintenance) = join3(
            fetch_source(
                SourceKind::Reservation,
                timeout,
                self.reservations.get_by_agency(agency_id),
            ),
            fetch_source(
                SourceKind::Expense,
                timeout,
                self.expenses.get_by_agency(agency_id),
            ),
            fetch_source(
                SourceKind::Maintenance,
                timeout,
                self.maintenance.get_by_agency(agency_id),
            ),
        )
        .await;

        Ok((reservations?, expenses?, maintenance?))
    }
}

/// Await one repository call under `timeout`, tagging failures with `source_kind`
async fn fetch_source<T, F>(
    source_kind: SourceKind,
    timeout: Duration,
    fetch: F,
) -> Result<Vec<T>, ReportError>
where
    F: Future<Output = Result<Vec<T>, SourceError>>,
{
    match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(records)) => {
            debug!(source = %source_kind, records = records.len(), "Fetched source");
            Ok(records)
        }
        Ok(Err(error)) => Err(ReportError::source_unavailable(source_kind, &error.message)),
        Err(_elapsed) => Err(ReportError::source_timed_out(source_kind, timeout)),
    }
}
