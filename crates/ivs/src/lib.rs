//! # ivs
//!
//! Inventory valuation spreadsheet reports.
//!
//! Raw inventory records are read from the SQLite inventory database or the
//! legacy CSV export, normalized into [`CanonicalRow`]s, filtered by
//! location, sorted, and written as a single-sheet XLSX report whose
//! extended values and grand total are spreadsheet formulas.
//!
//! ## Example
//!
//! ```rust
//! use ivs::prelude::*;
//!
//! let rows = vec![CanonicalRow {
//!     location: "Warehouse A".into(),
//!     part: "P100".into(),
//!     description: "Widget".into(),
//!     qty: Amount::parse("12", 0).unwrap(),
//!     uom: "EA".into(),
//!     cost: Amount::parse("3.50", 0).unwrap(),
//! }];
//!
//! let mut sheet = Worksheet::default();
//! let shape = report::populate(&mut sheet, &ReportLayout::default(), &rows).unwrap();
//!
//! assert_eq!(shape.total_row, 4);
//! assert_eq!(sheet.value(2, 7).unwrap().formula_text(), Some("=SUM(D2*F2)"));
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod row;
pub mod sort;

pub use config::{ReportConfig, ReportSettings, SourceConfig};
pub use error::{Error, Result};
pub use filter::{FilterCriteria, Preset};
pub use normalize::{BlankCounting, BlankPartRule, ColumnMap};
pub use period::ReportingPeriod;
pub use pipeline::{run, run_with_source, RunSummary};
pub use report::ReportLayout;
pub use row::{Amount, CanonicalRow};
