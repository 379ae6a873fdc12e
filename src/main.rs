//! Fleet Reports CLI
//!
//! Command-line interface producing cash flow reports from the JSON exports of
//! a rental agency.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --data-dir exports --agency agency-1 --period last-month
//! cargo run -- --data-dir exports --agency agency-1 --from 2024-01-01 --to 2024-01-31 --format csv > cash-flow.csv
//! cargo run -- --data-dir exports --agency agency-1 --period this-year --category Fuel --format json
//! cargo run -- --data-dir exports --agency agency-1 --format csv --output reports/
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `fleet_reports=info`),
//! so stdout only carries the report.
//!
//! # Exit Codes
//!
//! - 0: Success, possibly with skipped records (logged as a warning)
//! - 1: Error (invalid range, unreadable source, timeout, output failure, etc.)

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use chrono::Utc;
use fleet_reports::cli::{self, CliArgs, OutputFormat};
use fleet_reports::io::{export_file_name, write_json, write_summary, write_transactions_csv};
use fleet_reports::{JsonDirectorySource, ReportConfig, ReportEngine, ReportError, ReportResult};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "fleet_reports=info";

fn main() {
    init_tracing();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        error!(stage = %e.stage(), "{}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &CliArgs) -> Result<(), ReportError> {
    let config = args.to_report_config(ReportConfig::load(args.config.as_deref())?);
    let now = Utc::now();

    // Range validation happens here, before any source is read
    let filter = args.transaction_filter(now.date_naive())?;

    let engine = ReportEngine::from_source(JsonDirectorySource::new(&args.data_dir), config);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(engine.run_report_at(&args.agency, &filter, now))?;

    if result.has_skipped_records() {
        warn!(
            skipped = result.failure_count(),
            "Report loaded, but some records were skipped"
        );
    }

    let mut output = open_output(args, &result)?;
    match args.format {
        OutputFormat::Summary => write_summary(&result, &mut *output)?,
        OutputFormat::Json => write_json(&result, &mut *output)?,
        OutputFormat::Csv => write_transactions_csv(&result.transactions, &mut *output)?,
    }
    output.flush()?;

    info!(
        transactions = result.transactions.len(),
        format = ?args.format,
        "Report written"
    );
    Ok(())
}

fn open_output(args: &CliArgs, result: &ReportResult) -> Result<Box<dyn Write>, ReportError> {
    let Some(path) = &args.output else {
        return Ok(Box::new(io::stdout().lock()));
    };

    let path = resolve_output_path(path, args.format, result);
    info!(path = %path.display(), "Writing report to file");
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

/// A directory given for a CSV export receives the default download name
fn resolve_output_path(path: &Path, format: OutputFormat, result: &ReportResult) -> PathBuf {
    if format == OutputFormat::Csv && path.is_dir() {
        path.join(export_file_name(&result.range))
    } else {
        path.to_path_buf()
    }
}
