//! Raw record normalization
//!
//! Turns source-shaped [`RawRecord`]s into [`CanonicalRow`]s using a fixed
//! [`ColumnMap`]. Rows without a part number are skipped, and a location
//! group with too many of them is cut off by the [`BlankPartRule`].

use ivs_source::RawRecord;

use crate::error::{Error, Result};
use crate::row::{Amount, CanonicalRow};

/// Positional layout of a record source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub location: usize,
    pub part: usize,
    pub description: usize,
    pub qty: usize,
    pub uom: usize,
    pub cost: usize,
    /// Extended value column; only required to be present, never read
    pub extended: Option<usize>,
    /// Leading characters removed from the cost columns
    pub cost_prefix: usize,
    /// Records with a blank location belong to the last location seen
    pub carry_forward: bool,
}

impl ColumnMap {
    /// Layout of the legacy 16-column CSV export
    pub const fn legacy_csv() -> Self {
        Self {
            location: 0,
            part: 1,
            description: 2,
            qty: 10,
            uom: 12,
            cost: 14,
            extended: Some(15),
            cost_prefix: 2,
            carry_forward: true,
        }
    }

    /// Layout of the inventory database query
    pub const fn database() -> Self {
        Self {
            location: 6,
            part: 4,
            description: 5,
            qty: 9,
            uom: 8,
            cost: 1,
            extended: None,
            cost_prefix: 0,
            carry_forward: false,
        }
    }

    /// Fewest fields a data record must have
    pub fn min_width(&self) -> usize {
        [
            self.location,
            self.part,
            self.description,
            self.qty,
            self.uom,
            self.cost,
            self.extended.unwrap_or(0),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// How blank-part rows are counted within a location group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankCounting {
    /// Every blank-part row in the group counts
    #[default]
    Cumulative,
    /// A row with a part number resets the count
    Consecutive,
}

/// Skips blank-part rows and truncates noisy location groups
///
/// A record carrying a Location starts a new group with a count of zero.
/// Each blank-part row (the location header row included) bumps the count;
/// once it exceeds `limit` the rest of the group is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankPartRule {
    /// Blank rows tolerated per group, `None` to never truncate
    pub limit: Option<usize>,
    pub counting: BlankCounting,
}

impl BlankPartRule {
    /// Blank rows tolerated by the legacy export
    pub const DEFAULT_LIMIT: usize = 2;

    /// Truncate after `limit` blank rows
    pub fn new(limit: usize, counting: BlankCounting) -> Self {
        Self {
            limit: Some(limit),
            counting,
        }
    }

    /// Skip blank-part rows but never truncate
    pub fn disabled() -> Self {
        Self {
            limit: None,
            counting: BlankCounting::Cumulative,
        }
    }

    fn exceeded(&self, blanks: usize) -> bool {
        self.limit.map_or(false, |limit| blanks > limit)
    }
}

impl Default for BlankPartRule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, BlankCounting::Cumulative)
    }
}

/// Result of normalizing one source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub rows: Vec<CanonicalRow>,
    /// Rows skipped for having no part number
    pub blank_parts: usize,
    /// Data rows dropped by group truncation
    pub truncated: usize,
}

#[derive(Debug, Default)]
struct Group {
    location: Option<String>,
    blanks: usize,
    truncated: bool,
}

/// Normalize records in source order
pub fn normalize(records: &[RawRecord], map: &ColumnMap, rule: &BlankPartRule) -> Result<Normalized> {
    let mut out = Normalized::default();
    let mut group = Group::default();

    for record in records {
        let location = record.field(map.location).unwrap_or("");
        if location.is_empty() && !map.carry_forward {
            return Err(Error::malformed(record.line, "blank location"));
        }
        if !location.is_empty() {
            group = Group {
                location: Some(location.to_string()),
                ..Group::default()
            };
        }
        let current = match group.location.as_deref() {
            Some(current) => current,
            None => {
                return Err(Error::malformed(
                    record.line,
                    "blank location before any location",
                ))
            }
        };

        if record.field(map.part).unwrap_or("").is_empty() {
            group.blanks += 1;
            out.blank_parts += 1;
            if rule.exceeded(group.blanks) && !group.truncated {
                tracing::debug!(line = record.line, location = current, "truncating location group");
                group.truncated = true;
            }
            continue;
        }

        if group.truncated {
            tracing::debug!(line = record.line, location = current, "dropped trailing row");
            out.truncated += 1;
            continue;
        }
        if rule.counting == BlankCounting::Consecutive {
            group.blanks = 0;
        }

        let row = normalize_record(record, map, current)?;
        out.rows.push(row);
    }

    Ok(out)
}

/// Build a canonical row from a data record
pub fn normalize_record(record: &RawRecord, map: &ColumnMap, location: &str) -> Result<CanonicalRow> {
    if record.len() < map.min_width() {
        return Err(Error::malformed(
            record.line,
            format!(
                "expected at least {} fields, found {}",
                map.min_width(),
                record.len()
            ),
        ));
    }

    let text = |index: usize| record.field(index).unwrap_or("").to_string();
    let amount = |index: usize, prefix: usize, name: &str| {
        let raw = record.field(index).unwrap_or("");
        Amount::parse(raw, prefix)
            .ok_or_else(|| Error::malformed(record.line, format!("bad {} value {:?}", name, raw)))
    };

    Ok(CanonicalRow {
        location: location.to_string(),
        part: text(map.part),
        description: text(map.description),
        qty: amount(map.qty, 0, "qty")?,
        uom: text(map.uom),
        cost: amount(map.cost, map.cost_prefix, "cost")?,
    })
}
