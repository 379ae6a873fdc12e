//! Repository traits for the three report sources
//!
//! The engine only depends on these abstractions, so the same pipeline runs
//! over JSON exports on disk, an HTTP client or in-memory fixtures in tests.
//! Each call returns every record of one agency; filtering happens after
//! adaptation, never in the repository.
//!
//! An `Err` means the collection could not be loaded at all. A single element
//! that does not decode is returned as [`SourceRecord::Malformed`] instead and
//! becomes a skipped record.

use std::future::Future;

use crate::types::{
    ExpenseRecord, MaintenanceRecord, ReservationRecord, SourceError, SourceRecord,
};

/// Source of reservation (revenue) records
pub trait ReservationRepository {
    /// Fetch all reservations of an agency
    fn get_by_agency(
        &self,
        agency_id: &str,
    ) -> impl Future<Output = Result<Vec<SourceRecord<ReservationRecord>>, SourceError>> + Send;
}

/// Source of expense records
pub trait ExpenseRepository {
    /// Fetch all expenses of an agency
    fn get_by_agency(
        &self,
        agency_id: &str,
    ) -> impl Future<Output = Result<Vec<SourceRecord<ExpenseRecord>>, SourceError>> + Send;
}

/// Source of maintenance records
pub trait MaintenanceRepository {
    /// Fetch all maintenance records of an agency, completed or not
    fn get_by_agency(
        &self,
        agency_id: &str,
    ) -> impl Future<Output = Result<Vec<SourceRecord<MaintenanceRecord>>, SourceError>> + Send;
}
