//! # ivs-core
//!
//! Cell grid document model for the inventory valuation report.
//!
//! This crate provides the types every other ivs crate builds on:
//! - [`CellValue`] - Values stored in a cell (numbers, strings, formulas)
//! - [`CellAddress`] - A1-style cell addressing
//! - [`Style`], [`FontStyle`], [`NumberFormat`] - Cell formatting
//! - [`Worksheet`] - The in-memory grid
//! - [`Document`] and [`DocumentStore`] - The capability set a report is
//!   written against, plus [`MemoryStore`] for keeping documents in memory
//!
//! ## Example
//!
//! ```rust
//! use ivs_core::{CellValue, Document, FontStyle, Worksheet};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//!
//! // Document methods are 1-based, like the spreadsheet itself
//! sheet.set_value(1, 1, CellValue::string("Location")).unwrap();
//! sheet.set_font(1, 1, &FontStyle::new().with_bold(true)).unwrap();
//! sheet.set_value(2, 4, CellValue::Number(12.0)).unwrap();
//! sheet.set_value(2, 7, CellValue::formula("SUM(D2*F2)")).unwrap();
//!
//! assert_eq!(sheet.max_row(), 2);
//! assert_eq!(sheet.value(2, 7).unwrap().formula_text(), Some("=SUM(D2*F2)"));
//! ```

pub mod cell;
pub mod document;
pub mod error;
pub mod memory;
pub mod style;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellData, CellValue};
pub use document::{Document, DocumentStore};
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use style::{FontStyle, NumberFormat, Style, StylePool};
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
