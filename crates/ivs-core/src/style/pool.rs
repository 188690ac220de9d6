//! Style pool for deduplication

use super::Style;
use ahash::AHashMap;

/// Style pool for deduplicating styles
///
/// Report cells share a handful of styles (title, body, per-column number
/// formats). The pool stores each unique style once and cells reference it
/// by index.
#[derive(Debug, Clone)]
pub struct StylePool {
    /// All unique styles (index 0 is default)
    styles: Vec<Style>,
    /// Fast lookup for deduplication
    index_map: AHashMap<Style, u32>,
}

impl StylePool {
    /// Create a new style pool with default style at index 0
    pub fn new() -> Self {
        let mut pool = Self {
            styles: Vec::with_capacity(16),
            index_map: AHashMap::with_capacity(16),
        };

        let default = Style::default();
        pool.index_map.insert(default.clone(), 0);
        pool.styles.push(default);

        pool
    }

    /// Get or create a style, returning its index
    pub fn get_or_insert(&mut self, style: Style) -> u32 {
        if let Some(&idx) = self.index_map.get(&style) {
            return idx;
        }

        let idx = self.styles.len() as u32;
        self.index_map.insert(style.clone(), idx);
        self.styles.push(style);
        idx
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Get the default style (index 0)
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    /// Get the number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the pool holds only the default style
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Style)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FontStyle, NumberFormat};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_style() {
        let pool = StylePool::new();
        assert_eq!(pool.len(), 1);
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), Some(&Style::default()));
    }

    #[test]
    fn test_deduplication() {
        let mut pool = StylePool::new();

        let arial = FontStyle::new().with_name("Arial").with_size(10.0);
        let title = Style {
            font: arial.clone().with_bold(true),
            ..Style::default()
        };
        let title_again = title.clone();
        let body = Style {
            font: arial,
            ..Style::default()
        };

        let idx1 = pool.get_or_insert(title);
        let idx2 = pool.get_or_insert(title_again);
        let idx3 = pool.get_or_insert(body);

        assert_eq!(idx1, idx2);
        assert_ne!(idx1, idx3);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_number_format_distinguishes_styles() {
        let mut pool = StylePool::new();

        let plain = Style {
            font: FontStyle::new().with_name("Arial"),
            ..Style::default()
        };
        let decimal = Style {
            number_format: NumberFormat::decimal(),
            ..plain.clone()
        };

        let plain = pool.get_or_insert(plain);
        let decimal = pool.get_or_insert(decimal);

        assert_ne!(plain, decimal);
        assert_eq!(
            pool.get(decimal).map(|s| s.number_format.format_string()),
            Some("0.00")
        );
    }
}
