use crate::config::ReportConfig;
use crate::core::{CategoryFilter, ReportPeriod, TransactionFilter};
use crate::types::{DateRange, FlowType, ReportError, SourceKind};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Build cash flow reports for a rental agency
#[derive(Parser, Debug)]
#[command(name = "fleet-reports")]
#[command(
    about = "Cash flow reports over rental reservations, expenses and maintenance",
    long_about = None
)]
pub struct CliArgs {
    /// Directory holding one sub-directory of JSON exports per agency
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Agency to report on
    #[arg(long = "agency", value_name = "ID")]
    pub agency: String,

    /// First day of the report (YYYY-MM-DD)
    #[arg(long = "from", value_name = "DATE", requires = "to", conflicts_with = "period")]
    pub from: Option<NaiveDate>,

    /// Last day of the report, inclusive (YYYY-MM-DD)
    #[arg(long = "to", value_name = "DATE", requires = "from", conflicts_with = "period")]
    pub to: Option<NaiveDate>,

    /// Preset period used when no explicit dates are given
    #[arg(
        long = "period",
        value_name = "PERIOD",
        help = "this-month (default), last-month, this-quarter, this-year, past-week, past-month, past-quarter or past-year"
    )]
    pub period: Option<ReportPeriod>,

    /// Only keep transactions of this category ("all" for every category)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Only keep transactions from one source
    #[arg(
        long = "source",
        value_name = "SOURCE",
        help = "reservation, expense or maintenance"
    )]
    pub source: Option<SourceKind>,

    /// Only keep inflows or outflows
    #[arg(long = "flow", value_name = "FLOW", help = "inflow or outflow")]
    pub flow: Option<FlowType>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "summary")]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout (a directory gets the default CSV file name)
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Optional configuration file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Upper bound on each source fetch, in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Number of entries in the top expenses list
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,
}

/// Available output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Summary,
    Json,
    Csv,
}

impl CliArgs {
    /// Apply CLI overrides on top of the loaded configuration
    ///
    /// Zero values fall back to defaults with a warning, as for file values.
    pub fn to_report_config(&self, base: ReportConfig) -> ReportConfig {
        if self.timeout_ms.is_none() && self.top.is_none() {
            return base;
        }
        ReportConfig::new(
            self.timeout_ms.unwrap_or(base.fetch_timeout_ms),
            self.top.unwrap_or(base.top_n),
            base.trend_months,
        )
    }

    /// Build the transaction filter, resolving presets against `today`
    ///
    /// Explicit `--from`/`--to` win; otherwise `--period` (default
    /// `this-month`) is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidRange`] when `--from` is after `--to`.
    pub fn transaction_filter(&self, today: NaiveDate) -> Result<TransactionFilter, ReportError> {
        let range = match (self.from, self.to) {
            (Some(from), Some(to)) => DateRange::new(from, to)?,
            _ => self.period.unwrap_or_default().resolve(today)?,
        };

        Ok(TransactionFilter::new(range)
            .with_category(CategoryFilter::parse(self.category.as_deref()))
            .with_source(self.source)
            .with_flow(self.flow))
    }
}
