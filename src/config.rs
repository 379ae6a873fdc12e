//! Report configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `FLEET_REPORTS_*` environment variables. The CLI applies its own flags on
//! top of the loaded value.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::warn;

use crate::core::aggregator::{DEFAULT_TOP_N, DEFAULT_TREND_MONTHS};
use crate::types::ReportError;

/// Looked up next to the working directory when no `--config` is given
pub const DEFAULT_CONFIG_NAME: &str = "fleet-reports";

/// Prefix of the environment variables overriding file values
pub const ENV_PREFIX: &str = "FLEET_REPORTS";

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Tunables of one report run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Upper bound on each upstream fetch, in milliseconds
    pub fetch_timeout_ms: u64,
    /// Number of entries in the top expenses list
    pub top_n: usize,
    /// Length of the trailing monthly trend window
    pub trend_months: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            top_n: DEFAULT_TOP_N,
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }
}

impl ReportConfig {
    /// Create a ReportConfig with custom values
    ///
    /// Zero is not a usable value for any field; it is replaced by the default
    /// and a warning is logged.
    pub fn new(fetch_timeout_ms: u64, top_n: usize, trend_months: u32) -> Self {
        let default = Self::default();

        let fetch_timeout_ms = if fetch_timeout_ms == 0 {
            warn!(
                "Invalid fetch_timeout_ms ({}), using default ({})",
                fetch_timeout_ms, default.fetch_timeout_ms
            );
            default.fetch_timeout_ms
        } else {
            fetch_timeout_ms
        };

        let top_n = if top_n == 0 {
            warn!("Invalid top_n ({}), using default ({})", top_n, default.top_n);
            default.top_n
        } else {
            top_n
        };

        let trend_months = if trend_months == 0 {
            warn!(
                "Invalid trend_months ({}), using default ({})",
                trend_months, default.trend_months
            );
            default.trend_months
        } else {
            trend_months
        };

        Self {
            fetch_timeout_ms,
            top_n,
            trend_months,
        }
    }

    /// Load the layered configuration
    ///
    /// An explicit `path` must exist. Without one, `fleet-reports.toml` in the
    /// working directory is used when present.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if a file cannot be read or a value has
    /// the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ReportError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let loaded: ReportConfig = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(Self::new(
            loaded.fetch_timeout_ms,
            loaded.top_n,
            loaded.trend_months,
        ))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
