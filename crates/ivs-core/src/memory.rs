//! In-memory document store

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::document::DocumentStore;
use crate::error::Error;
use crate::worksheet::Worksheet;

/// A [`DocumentStore`] that keeps saved worksheets in memory
///
/// Saved documents are snapshots: later edits to the handle that was saved
/// do not show up until it is saved again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<BTreeMap<PathBuf, Worksheet>>,
    fail_saves: bool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose saves always fail
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Get a copy of the worksheet saved under `path`
    pub fn saved(&self, path: &Path) -> Option<Worksheet> {
        self.saved.borrow().get(path).cloned()
    }

    /// Paths that have been saved, in sorted order
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved.borrow().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryStore {
    type Document = Worksheet;
    type Error = Error;

    fn create_new(&self) -> Worksheet {
        Worksheet::default()
    }

    fn open_existing(&self, path: &Path) -> Result<Worksheet, Error> {
        self.saved(path)
            .ok_or_else(|| Error::DocumentNotFound(path.display().to_string()))
    }

    fn save_as(&self, document: &Worksheet, path: &Path) -> Result<(), Error> {
        if self.fail_saves {
            return Err(Error::other(format!(
                "refusing to save '{}'",
                path.display()
            )));
        }
        self.saved
            .borrow_mut()
            .insert(path.to_path_buf(), document.clone());
        Ok(())
    }
}
