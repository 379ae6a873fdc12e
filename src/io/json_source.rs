//! File-backed repositories
//!
//! Reads JSON exports of the rental backend laid out as
//!
//! ```text
//! <root>/<agency>/reservations.json
//! <root>/<agency>/expenses.json
//! <root>/<agency>/maintenance.json
//! ```
//!
//! Each file holds a JSON array of records with the backend's camelCase field
//! names. A missing file, or a file that is not a JSON array, makes the whole
//! source unavailable. Elements are decoded one by one: an element that does
//! not decode is returned as [`SourceRecord::Malformed`] next to the others.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::traits::{ExpenseRepository, MaintenanceRepository, ReservationRepository};
use crate::types::{
    ExpenseRecord, MaintenanceRecord, ReservationRecord, SourceError, SourceKind, SourceRecord,
};

/// Repository reading all three sources from a directory tree
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        JsonDirectorySource {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `source_kind` records of `agency_id`
    pub fn file_path(&self, agency_id: &str, source_kind: SourceKind) -> PathBuf {
        let file_name = match source_kind {
            SourceKind::Reservation => "reservations.json",
            SourceKind::Expense => "expenses.json",
            SourceKind::Maintenance => "maintenance.json",
        };
        self.root.join(agency_id).join(file_name)
    }

    async fn read_records<T: DeserializeOwned>(
        &self,
        agency_id: &str,
        source_kind: SourceKind,
    ) -> Result<Vec<SourceRecord<T>>, SourceError> {
        if agency_id.is_empty() || agency_id.contains(['/', '\\']) || agency_id == ".." {
            return Err(SourceError::new(format!("invalid agency id '{}'", agency_id)));
        }

        let path = self.file_path(agency_id, source_kind);
        debug!(path = %path.display(), "Reading source file");

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::new(format!("{}: {}", path.display(), e)))?;

        let elements: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::new(format!("{}: {}", path.display(), e)))?;

        let records: Vec<SourceRecord<T>> = elements
            .into_iter()
            .enumerate()
            .map(|(position, value)| SourceRecord::decode(position, value))
            .collect();

        let malformed = records
            .iter()
            .filter(|record| matches!(record, SourceRecord::Malformed { .. }))
            .count();
        if malformed > 0 {
            warn!(path = %path.display(), malformed, "Source file has undecodable records");
        }
        Ok(records)
    }
}

impl ReservationRepository for JsonDirectorySource {
    async fn get_by_agency(
        &self,
        agency_id: &str,
    ) -> Result<Vec<SourceRecord<ReservationRecord>>, SourceError> {
        self.read_records(agency_id, SourceKind::Reservation).await
    }
}

impl ExpenseRepository for JsonDirectorySource {
    async fn get_by_agency(
        &self,
        agency_id: &str,
    ) -> Result<Vec<SourceRecord<ExpenseRecord>>, SourceError> {
        self.read_records(agency_id, SourceKind::Expense).await
    }
}

impl MaintenanceRepository for JsonDirectorySource {
    async fn get_by_agency(
        &self,
        agency_id: &str,
    ) -> Result<Vec<SourceRecord<MaintenanceRecord>>, SourceError> {
        self.read_records(agency_id, SourceKind::Maintenance).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::fs;
    use tempfile::TempDir;

    fn agency_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let agency = dir.path().join("agency-1");
        fs::create_dir_all(&agency).unwrap();
        for (name, contents) in files {
            fs::write(agency.join(name), contents).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_reads_camel_case_records() {
        let dir = agency_dir(&[(
            "expenses.json",
            r#"[{"id":"e-1","title":"Fuel refill","amount":120.5,"createdAt":"2024-01-20T16:45:00Z","categoryName":"Fuel"}]"#,
        )]);
        let source = JsonDirectorySource::new(dir.path());

        let expenses = ExpenseRepository::get_by_agency(&source, "agency-1").await.unwrap();

        assert_eq!(expenses.len(), 1);
        let SourceRecord::Valid(expense) = &expenses[0] else {
            panic!("expected a decoded expense, got {:?}", expenses[0]);
        };
        assert_eq!(expense.id, "e-1");
        assert_eq!(expense.amount, Some(Decimal::new(1205, 1)));
        assert_eq!(expense.category_name.as_deref(), Some("Fuel"));
    }

    #[tokio::test]
    async fn test_maintenance_defaults_to_not_completed() {
        let dir = agency_dir(&[("maintenance.json", r#"[{"id":"m-1","cost":45}]"#)]);
        let source = JsonDirectorySource::new(dir.path());

        let records = MaintenanceRepository::get_by_agency(&source, "agency-1").await.unwrap();

        assert!(matches!(
            &records[0],
            SourceRecord::Valid(MaintenanceRecord { is_completed: false, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = agency_dir(&[]);
        let source = JsonDirectorySource::new(dir.path());

        let error = ReservationRepository::get_by_agency(&source, "agency-1")
            .await
            .unwrap_err();

        assert!(error.message.contains("reservations.json"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_error() {
        let dir = agency_dir(&[("reservations.json", r#"{"not":"an array"}"#)]);
        let source = JsonDirectorySource::new(dir.path());

        let result = ReservationRepository::get_by_agency(&source, "agency-1").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bad_element_does_not_fail_the_file() {
        let dir = agency_dir(&[(
            "reservations.json",
            r#"[
                {"id":"r-1","createdAt":"2024-01-05T09:30:00Z","totalAmount":500},
                {"id":"r-2","createdAt":"05/01/2024","totalAmount":300},
                {"createdAt":"2024-01-06T09:30:00Z","totalAmount":20}
            ]"#,
        )]);
        let source = JsonDirectorySource::new(dir.path());

        let records = ReservationRepository::get_by_agency(&source, "agency-1")
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert!(matches!(&records[0], SourceRecord::Valid(record) if record.id == "r-1"));
        assert!(matches!(
            &records[1],
            SourceRecord::Malformed { record_id, reason }
                if record_id == "r-2" && reason.contains("05/01/2024")
        ));
        assert!(matches!(
            &records[2],
            SourceRecord::Malformed { record_id, .. } if record_id == "#2"
        ));
    }

    #[tokio::test]
    async fn test_rejects_agency_escaping_root() {
        let dir = agency_dir(&[]);
        let source = JsonDirectorySource::new(dir.path());

        let error = ExpenseRepository::get_by_agency(&source, "../agency-1")
            .await
            .unwrap_err();

        assert!(error.message.contains("invalid agency id"));
    }
}
