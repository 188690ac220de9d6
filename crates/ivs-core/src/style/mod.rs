//! Cell styling types
//!
//! A report cell carries two pieces of formatting: a [`FontStyle`] and a
//! [`NumberFormat`]. [`Style`] bundles them and [`StylePool`] deduplicates
//! styles so cells reference them by index.

mod font;
mod number_format;
mod pool;

pub use font::FontStyle;
pub use number_format::NumberFormat;
pub use pool::StylePool;

/// Complete cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Number format
    pub number_format: NumberFormat,
}
