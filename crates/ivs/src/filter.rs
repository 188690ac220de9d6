//! Location filtering

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::row::CanonicalRow;

/// Decide whether a location passes
///
/// Exclusion wins over inclusion; an empty include set lets everything
/// through.
pub fn keep(location: &str, include: &BTreeSet<String>, exclude: &BTreeSet<String>) -> bool {
    if exclude.contains(location) {
        return false;
    }
    include.is_empty() || include.contains(location)
}

/// Include and exclude sets of location names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl FilterCriteria {
    /// Criteria that keep every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep the given location (repeatable)
    pub fn include<S: Into<String>>(mut self, location: S) -> Self {
        self.include.insert(location.into());
        self
    }

    /// Drop the given location (repeatable)
    pub fn exclude<S: Into<String>>(mut self, location: S) -> Self {
        self.exclude.insert(location.into());
        self
    }

    /// Union both sets with another set of criteria
    pub fn merge(mut self, other: FilterCriteria) -> Self {
        self.include.extend(other.include);
        self.exclude.extend(other.exclude);
        self
    }

    pub fn included(&self) -> &BTreeSet<String> {
        &self.include
    }

    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    /// Check whether no location is filtered
    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check whether a row passes
    pub fn keep(&self, row: &CanonicalRow) -> bool {
        keep(&row.location, &self.include, &self.exclude)
    }

    /// Retain the rows that pass, in order
    pub fn apply(&self, mut rows: Vec<CanonicalRow>) -> Vec<CanonicalRow> {
        if self.is_unrestricted() {
            return rows;
        }
        rows.retain(|row| self.keep(row));
        rows
    }
}

/// Category filters of the legacy report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Everything except Upholstery and Apparel
    Warehouse,
    /// Upholstery only
    Upholstery,
    /// Apparel only
    Apparel,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Warehouse, Preset::Upholstery, Preset::Apparel];

    /// Filter criteria of this preset
    pub fn criteria(self) -> FilterCriteria {
        match self {
            Preset::Warehouse => FilterCriteria::new()
                .exclude("Upholstery")
                .exclude("Apparel"),
            Preset::Upholstery => FilterCriteria::new().include("Upholstery"),
            Preset::Apparel => FilterCriteria::new().include("Apparel"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Warehouse => "warehouse",
            Preset::Upholstery => "upholstery",
            Preset::Apparel => "apparel",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Preset name not recognized
#[derive(Debug, Clone, Error)]
#[error("unknown preset '{0}' (expected warehouse, upholstery or apparel)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Amount;

    fn row(location: &str) -> CanonicalRow {
        CanonicalRow {
            location: location.into(),
            part: "P".into(),
            description: String::new(),
            qty: Amount::default(),
            uom: "EA".into(),
            cost: Amount::default(),
        }
    }

    fn locations(rows: &[CanonicalRow]) -> Vec<&str> {
        rows.iter().map(|r| r.location.as_str()).collect()
    }

    #[test]
    fn test_include_only() {
        let criteria = FilterCriteria::new().include("Main");
        let kept = criteria.apply(vec![row("Main"), row("Annex")]);
        assert_eq!(locations(&kept), vec!["Main"]);
    }

    #[test]
    fn test_exclude_wins() {
        let criteria = FilterCriteria::new().include("Main").exclude("Main");
        assert!(!criteria.keep(&row("Main")));
    }

    #[test]
    fn test_empty_criteria_keep_everything() {
        let criteria = FilterCriteria::new();
        assert!(criteria.is_unrestricted());
        let kept = criteria.apply(vec![row("Main"), row("Annex")]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_presets() {
        let rows = || vec![row("Main"), row("Upholstery"), row("Apparel")];

        assert_eq!(
            locations(&Preset::Warehouse.criteria().apply(rows())),
            vec!["Main"]
        );
        assert_eq!(
            locations(&Preset::Upholstery.criteria().apply(rows())),
            vec!["Upholstery"]
        );
        assert_eq!(
            locations(&Preset::Apparel.criteria().apply(rows())),
            vec!["Apparel"]
        );
    }

    #[test]
    fn test_merge_with_preset() {
        let criteria = FilterCriteria::new()
            .exclude("Annex")
            .merge(Preset::Warehouse.criteria());
        let kept = criteria.apply(vec![row("Main"), row("Annex"), row("Apparel")]);
        assert_eq!(locations(&kept), vec!["Main"]);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Warehouse".parse::<Preset>().unwrap(), Preset::Warehouse);
        assert_eq!("apparel".parse::<Preset>().unwrap(), Preset::Apparel);
        assert!("garden".parse::<Preset>().is_err());
    }
}
