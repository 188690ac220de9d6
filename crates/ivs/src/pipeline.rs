//! Report run: source → normalize → filter → sort → build

use std::path::PathBuf;

use chrono::NaiveDate;
use ivs_core::DocumentStore;
use ivs_source::RecordSource;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::normalize::normalize;
use crate::period::ReportingPeriod;
use crate::report;
use crate::sort::sort_rows;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub period: ReportingPeriod,
    pub records_read: usize,
    pub rows_normalized: usize,
    pub rows_kept: usize,
    pub destination: PathBuf,
}

/// Run the report with the source named in `config`
pub fn run<S: DocumentStore>(config: &ReportConfig, store: &S, today: NaiveDate) -> Result<RunSummary> {
    let source = config.source.open();
    run_with_source(config, source.as_ref(), store, today)
}

/// Run the report against an explicit record source
///
/// Any error aborts the run before the report is saved.
pub fn run_with_source<S, R>(
    config: &ReportConfig,
    source: &R,
    store: &S,
    today: NaiveDate,
) -> Result<RunSummary>
where
    S: DocumentStore,
    R: RecordSource + ?Sized,
{
    let period = ReportingPeriod::for_run_date(today);
    let destination = config.destination(&period);
    tracing::info!(period = %period, source = %source.describe(), "starting report");

    let records = source.read_records()?;
    tracing::info!(records = records.len(), "read source records");

    let normalized = normalize(&records, &config.source.column_map(), &config.blank_part_rule)?;
    tracing::info!(
        rows = normalized.rows.len(),
        blank_parts = normalized.blank_parts,
        truncated = normalized.truncated,
        "normalized rows"
    );
    let rows_normalized = normalized.rows.len();

    let mut rows = config.filter.apply(normalized.rows);
    tracing::info!(kept = rows.len(), dropped = rows_normalized - rows.len(), "filtered rows");

    sort_rows(&mut rows);
    report::build(store, &config.layout, &rows, &destination)?;

    Ok(RunSummary {
        period,
        records_read: records.len(),
        rows_normalized,
        rows_kept: rows.len(),
        destination,
    })
}
