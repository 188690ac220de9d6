//! CSV source options

/// Options for reading the legacy CSV export
#[derive(Debug, Clone)]
pub struct CsvSourceOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Report preamble lines skipped before the data (default: 6)
    pub preamble_lines: usize,
}

impl Default for CsvSourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            preamble_lines: 6,
        }
    }
}
