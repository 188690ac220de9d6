//! ivs - quarterly inventory valuation report

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ivs::{Preset, ReportSettings};
use ivs_xlsx::XlsxStore;

#[derive(Parser)]
#[command(name = "ivs")]
#[command(
    author,
    version,
    about = "Write the quarterly inventory valuation spreadsheet",
    disable_help_flag = true
)]
struct Cli {
    /// Only report this location; repeat for more
    /// [env: IVS_INCLUDE, comma separated]
    #[arg(short, long)]
    include: Vec<String>,

    /// Leave out this location; repeat for more
    /// [env: IVS_EXCLUDE, comma separated]
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Named location filter: warehouse, upholstery or apparel
    #[arg(long, env = "IVS_PRESET")]
    preset: Option<Preset>,

    /// Directory holding the inventory database
    #[arg(short = 'h', long, env = "IVS_HOST")]
    host: Option<String>,

    /// Inventory database file name
    #[arg(long, env = "IVS_DATABASE")]
    database: Option<String>,

    #[arg(long, env = "IVS_USER")]
    user: Option<String>,

    #[arg(long, env = "IVS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Query timeout in seconds (default: 30)
    #[arg(long, env = "IVS_QUERY_TIMEOUT")]
    timeout: Option<u64>,

    /// Read the legacy CSV export instead of the database
    #[arg(long = "csv", env = "IVS_CSV_FILE")]
    csv_file: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, env = "IVS_XLSX_DIR")]
    path: Option<PathBuf>,

    /// Report file name, written after the quarter label
    #[arg(long, env = "IVS_XLSX_FILE")]
    report_name: Option<String>,

    /// Blank part rows kept per location before the rest is dropped
    #[arg(long)]
    blank_part_limit: Option<usize>,

    /// Count only consecutive blank part rows
    #[arg(long)]
    consecutive_blanks: bool,

    /// Never drop rows after blank part rows
    #[arg(long)]
    no_truncate: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn into_settings(self) -> ReportSettings {
        ReportSettings {
            host: self.host,
            database: self.database,
            user: self.user,
            password: self.password,
            timeout: self.timeout.map(Duration::from_secs),
            csv_file: self.csv_file,
            output_dir: self.path,
            report_name: self.report_name,
            include: locations(self.include, "IVS_INCLUDE"),
            exclude: locations(self.exclude, "IVS_EXCLUDE"),
            preset: self.preset,
            blank_part_limit: self.blank_part_limit,
            consecutive_blanks: self.consecutive_blanks,
            no_truncate: self.no_truncate,
        }
    }
}

/// Locations from the flags, or from the comma separated variable `var`
fn locations(flags: Vec<String>, var: &str) -> Vec<String> {
    if !flags.is_empty() {
        return flags;
    }
    std::env::var(var)
        .map(|value| split_list(&value))
        .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(String::from).collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ivs::logging::init();

    let config = cli
        .into_settings()
        .resolve()
        .context("Invalid configuration")?;

    let today = chrono::Local::now().date_naive();
    let summary = ivs::run(&config, &XlsxStore::new(), today)
        .with_context(|| format!("Failed to build the {} report", config.report_name))?;

    tracing::info!(
        period = %summary.period,
        records = summary.records_read,
        rows = summary.rows_kept,
        "report complete"
    );
    println!(
        "Wrote {} rows to '{}'",
        summary.rows_kept,
        summary.destination.display()
    );

    Ok(())
}
