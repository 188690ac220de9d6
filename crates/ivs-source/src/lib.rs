//! # ivs-source
//!
//! Raw inventory record sources for ivs.
//!
//! A source produces [`RawRecord`]s: ordered text fields tagged with the line
//! or row they came from. Two sources ship: [`CsvSource`] for the legacy
//! fixed-layout export and [`DbSource`] for the SQLite inventory database.

mod database;
mod error;
mod export;
mod options;
mod record;

pub use database::{ConnectionDescriptor, DbSource, INVENTORY_QUERY};
pub use error::{SourceError, SourceResult};
pub use export::CsvSource;
pub use options::CsvSourceOptions;
pub use record::RawRecord;

/// Something that can produce the raw records of one report run
pub trait RecordSource {
    /// Read every record, in source order
    fn read_records(&self) -> SourceResult<Vec<RawRecord>>;

    /// Short human-readable description for logs and errors
    fn describe(&self) -> String;
}
