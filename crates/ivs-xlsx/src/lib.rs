//! # ivs-xlsx
//!
//! XLSX (Office Open XML) reader and writer for ivs report documents.
//!
//! [`XlsxStore`] is the [`ivs_core::DocumentStore`] the report is saved
//! through; [`XlsxWriter`] and [`XlsxReader`] do the actual encoding.

pub mod error;
pub mod reader;
pub mod store;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use store::XlsxStore;
pub use writer::XlsxWriter;
