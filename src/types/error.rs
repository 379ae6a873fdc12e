//! Error types for the fleet reports engine
//!
//! Two families of errors exist and they propagate differently:
//!
//! - **Adaptation failures** ([`AdaptationFailure`]): a single raw record could
//!   not be turned into a transaction. They are collected next to the
//!   successful transactions and never abort a report.
//! - **Report errors** ([`ReportError`]): the report as a whole cannot be
//!   produced (invalid range, unavailable or slow source, output failure).
//!   No partial result accompanies them.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::transaction::{RecordId, SourceKind};

/// Pipeline stage a report error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    /// Request validation, before any fetch
    Validation,
    /// Fetching one of the upstream collections
    Fetch(SourceKind),
    /// Serializing the result
    Export,
    /// Process setup (configuration, runtime, output files)
    Setup,
}

impl fmt::Display for ReportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStage::Validation => f.write_str("validation"),
            ReportStage::Fetch(source) => write!(f, "fetch:{}", source),
            ReportStage::Export => f.write_str("export"),
            ReportStage::Setup => f.write_str("setup"),
        }
    }
}

/// Report-level error
///
/// Any of these aborts the whole report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The requested range starts after it ends
    ///
    /// Raised before any source is fetched.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Requested first day
        from: NaiveDate,
        /// Requested last day
        to: NaiveDate,
    },

    /// An upstream repository returned an error
    #[error("Could not load {source_kind} data: {message}")]
    SourceUnavailable {
        /// Repository that failed
        source_kind: SourceKind,
        /// Description of the failure
        message: String,
    },

    /// An upstream repository did not answer in time
    #[error("Loading {source_kind} data timed out after {timeout_ms}ms")]
    SourceTimedOut {
        /// Repository that timed out
        source_kind: SourceKind,
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// The result could not be serialized
    #[error("Export error: {message}")]
    Export {
        /// Description of the serialization failure
        message: String,
    },

    /// I/O error while writing output or starting the runtime
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },
}

impl ReportError {
    /// Create an InvalidRange error
    pub fn invalid_range(from: NaiveDate, to: NaiveDate) -> Self {
        ReportError::InvalidRange { from, to }
    }

    /// Create a SourceUnavailable error
    pub fn source_unavailable(source_kind: SourceKind, message: &str) -> Self {
        ReportError::SourceUnavailable {
            source_kind,
            message: message.to_string(),
        }
    }

    /// Create a SourceTimedOut error
    pub fn source_timed_out(source_kind: SourceKind, timeout: Duration) -> Self {
        ReportError::SourceTimedOut {
            source_kind,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create an Export error
    pub fn export(message: &str) -> Self {
        ReportError::Export {
            message: message.to_string(),
        }
    }

    /// Stage of the pipeline this error belongs to
    pub fn stage(&self) -> ReportStage {
        match self {
            ReportError::InvalidRange { .. } => ReportStage::Validation,
            ReportError::SourceUnavailable { source_kind, .. }
            | ReportError::SourceTimedOut { source_kind, .. } => ReportStage::Fetch(*source_kind),
            ReportError::Export { .. } => ReportStage::Export,
            ReportError::Io { .. } | ReportError::Config { .. } => ReportStage::Setup,
        }
    }

    /// Whether the error means the data could not be loaded
    ///
    /// Shells use this to tell "could not load data" apart from other failures.
    pub fn is_load_failure(&self) -> bool {
        matches!(self.stage(), ReportStage::Fetch(_))
    }
}

// Conversion from io::Error to ReportError
impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        ReportError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ReportError
impl From<csv::Error> for ReportError {
    fn from(error: csv::Error) -> Self {
        ReportError::Export {
            message: error.to_string(),
        }
    }
}

// Conversion from serde_json::Error to ReportError
impl From<serde_json::Error> for ReportError {
    fn from(error: serde_json::Error) -> Self {
        ReportError::Export {
            message: error.to_string(),
        }
    }
}

// Conversion from config::ConfigError to ReportError
impl From<config::ConfigError> for ReportError {
    fn from(error: config::ConfigError) -> Self {
        ReportError::Config {
            message: error.to_string(),
        }
    }
}

/// Error returned by an upstream repository
///
/// The engine lifts it into [`ReportError::SourceUnavailable`] tagged with the
/// repository's source kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    /// Description of the failure
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        SourceError {
            message: message.into(),
        }
    }
}

/// Reason a raw record could not be adapted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FailureKind {
    /// A required field (date or amount) is absent
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the absent field, as spelled by the backend
        field: &'static str,
    },

    /// An amount is present but negative
    #[error("invalid amount {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// The payload element could not be decoded into a record
    #[error("undecodable record: {reason}")]
    Undecodable {
        /// Decoder message, naming the offending field when known
        reason: String,
    },
}

impl FailureKind {
    /// Create a MissingField failure
    pub fn missing_field(field: &'static str) -> Self {
        FailureKind::MissingField { field }
    }

    /// Create an InvalidAmount failure
    pub fn invalid_amount(amount: Decimal) -> Self {
        FailureKind::InvalidAmount { amount }
    }

    /// Create an Undecodable failure
    pub fn undecodable(reason: impl Into<String>) -> Self {
        FailureKind::Undecodable {
            reason: reason.into(),
        }
    }
}

/// A raw record excluded from the report, with the reason
///
/// Non-fatal: failures are accumulated and returned alongside the report so
/// the caller can surface the skipped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{source_kind} record '{record_id}': {kind}")]
pub struct AdaptationFailure {
    /// Collection the record came from
    pub source_kind: SourceKind,
    /// Identifier of the record within its collection
    pub record_id: RecordId,
    /// Why the record was rejected
    pub kind: FailureKind,
}

impl AdaptationFailure {
    pub fn new(source_kind: SourceKind, record_id: &str, kind: FailureKind) -> Self {
        AdaptationFailure {
            source_kind,
            record_id: record_id.to_string(),
            kind,
        }
    }
}
