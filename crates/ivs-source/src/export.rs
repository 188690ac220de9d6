//! Legacy CSV export source

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{SourceError, SourceResult};
use crate::options::CsvSourceOptions;
use crate::record::RawRecord;
use crate::RecordSource;

/// Reads the fixed-layout CSV inventory export
///
/// The export starts with a fixed number of report preamble lines that are
/// skipped; every record after them is returned as-is, whatever its width.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvSourceOptions,
}

impl CsvSource {
    /// Create a source for the export at `path` with default options
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            options: CsvSourceOptions::default(),
        }
    }

    /// Path of the export
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read records from any reader
    pub fn read<R: Read>(reader: R, options: &CsvSourceOptions) -> SourceResult<Vec<RawRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            // Blank lines produce no record, so the preamble is counted in lines
            let line = record
                .position()
                .map_or(index as u64 + 1, |pos| pos.line());
            if line <= options.preamble_lines as u64 {
                continue;
            }

            let fields = record.iter().map(str::to_string).collect();
            records.push(RawRecord::new(line, fields));
        }

        Ok(records)
    }
}

impl RecordSource for CsvSource {
    fn read_records(&self) -> SourceResult<Vec<RawRecord>> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(self.path.clone()),
            _ => SourceError::Io(e),
        })?;

        let records = Self::read(file, &self.options)?;
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "read csv export"
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("csv export {}", self.path.display())
    }
}
