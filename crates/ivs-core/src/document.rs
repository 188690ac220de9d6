//! Document capability traits
//!
//! A report is written against [`Document`], a 1-based cell grid, and
//! persisted through a [`DocumentStore`]. The store hands out owned document
//! handles; nothing keeps an implicit "current workbook".

use std::path::Path;

use crate::cell::CellValue;
use crate::error::Result;
use crate::style::{FontStyle, NumberFormat};

/// A cell grid with 1-based rows and columns
///
/// Row or column 0 is rejected with [`crate::Error::ZeroIndex`]. Formula
/// values are stored as text starting with `=` and are never evaluated.
pub trait Document {
    /// Get a cell's value ([`CellValue::Empty`] for untouched cells)
    fn value(&self, row: u32, col: u16) -> Result<CellValue>;

    /// Set a cell's value, keeping its formatting
    fn set_value(&mut self, row: u32, col: u16, value: CellValue) -> Result<()>;

    /// Get a cell's font
    fn font(&self, row: u32, col: u16) -> Result<FontStyle>;

    /// Set a cell's font, keeping its value and number format
    fn set_font(&mut self, row: u32, col: u16, font: &FontStyle) -> Result<()>;

    /// Get a cell's number format
    fn number_format(&self, row: u32, col: u16) -> Result<NumberFormat>;

    /// Set a cell's number format, keeping its value and font
    fn set_number_format(&mut self, row: u32, col: u16, format: &NumberFormat) -> Result<()>;

    /// Get a column's width in characters
    fn column_width(&self, col: u16) -> Result<f64>;

    /// Set a column's width in characters
    fn set_column_width(&mut self, col: u16, width: f64) -> Result<()>;

    /// Highest row holding any cell, 0 for an empty document
    fn max_row(&self) -> u32;
}

/// Creates, opens and saves [`Document`]s
pub trait DocumentStore {
    /// Document handle type produced by this store
    type Document: Document;

    /// Error raised by open and save operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a new, empty document
    fn create_new(&self) -> Self::Document;

    /// Open a previously saved document
    fn open_existing(&self, path: &Path) -> std::result::Result<Self::Document, Self::Error>;

    /// Save a document to `path`, replacing anything already there
    fn save_as(&self, document: &Self::Document, path: &Path)
        -> std::result::Result<(), Self::Error>;
}
