//! Prelude module - common imports for ivs users
//!
//! ```rust
//! use ivs::prelude::*;
//! ```

pub use crate::report;
pub use crate::{
    Amount, BlankCounting, BlankPartRule, CanonicalRow, ColumnMap, Error, FilterCriteria, Preset,
    ReportConfig, ReportLayout, ReportSettings, ReportingPeriod, Result, RunSummary, SourceConfig,
};

pub use ivs_core::{CellValue, Document, DocumentStore, MemoryStore, Worksheet};
pub use ivs_source::{CsvSource, DbSource, RawRecord, RecordSource};
pub use ivs_xlsx::{XlsxReader, XlsxStore, XlsxWriter};
