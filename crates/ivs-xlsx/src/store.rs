//! XLSX-backed document store

use std::path::Path;

use ivs_core::{DocumentStore, Worksheet};

use crate::error::XlsxError;
use crate::reader::XlsxReader;
use crate::writer::XlsxWriter;

/// A [`DocumentStore`] that persists worksheets as `.xlsx` files
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxStore;

impl XlsxStore {
    /// Create a store
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for XlsxStore {
    type Document = Worksheet;
    type Error = XlsxError;

    fn create_new(&self) -> Worksheet {
        Worksheet::default()
    }

    fn open_existing(&self, path: &Path) -> Result<Worksheet, XlsxError> {
        XlsxReader::read_file(path)
    }

    fn save_as(&self, document: &Worksheet, path: &Path) -> Result<(), XlsxError> {
        XlsxWriter::write_file(document, path)
    }
}
