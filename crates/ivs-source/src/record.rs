//! Raw source records

/// One source row: ordered text fields plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line (CSV) or row (database) number
    pub line: u64,
    /// Field values as text
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Create a record
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Field at `index`, `None` when the record is too short
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
