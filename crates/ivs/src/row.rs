//! Canonical inventory rows

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// A quantity or money value with exactly two fractional digits
///
/// Rounding is half away from zero, so `12.345` becomes `12.35` and
/// `-0.005` becomes `-0.01`. Renders as `-?\d+\.\d{2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Fractional digits carried by every amount
    pub const SCALE: u32 = 2;

    /// Round `value` to two places
    ///
    /// Returns `None` when the value is too large to carry two fractional
    /// digits.
    pub fn new(value: Decimal) -> Option<Self> {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        if rounded.scale() != Self::SCALE {
            return None;
        }
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Some(Self(rounded))
    }

    /// Parse a source numeric field
    ///
    /// Thousands separators are removed, then `prefix` leading characters
    /// (fixed-width currency columns), then any currency or sign decoration
    /// in front of the first digit. A `-` in that decoration makes the value
    /// negative. Returns `None` for empty or unparseable text.
    pub fn parse(raw: &str, prefix: usize) -> Option<Self> {
        let without_commas: String = raw.chars().filter(|&c| c != ',').collect();
        let unprefixed: String = without_commas.chars().skip(prefix).collect();
        let trimmed = unprefixed.trim();

        let start = trimmed.find(|c: char| c.is_ascii_digit() || c == '.')?;
        let (decoration, digits) = trimmed.split_at(start);

        let magnitude = Decimal::from_str(digits.trim_end()).ok()?;
        let value = if decoration.contains('-') {
            -magnitude
        } else {
            magnitude
        };
        Self::new(value)
    }

    /// Underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Value as a spreadsheet number
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One normalized inventory line
///
/// The extended value (qty times cost) is not stored; the report computes it
/// with a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRow {
    pub location: String,
    pub part: String,
    pub description: String,
    pub qty: Amount,
    pub uom: String,
    pub cost: Amount,
}

impl CanonicalRow {
    /// Sort key: location, then part
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.location, &self.part)
    }
}
