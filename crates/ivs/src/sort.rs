//! Row ordering

use crate::row::CanonicalRow;

/// Sort rows by location, then part
///
/// Byte-wise string comparison; rows with equal keys keep their order.
pub fn sort_rows(rows: &mut [CanonicalRow]) {
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Amount;

    fn row(location: &str, part: &str, description: &str) -> CanonicalRow {
        CanonicalRow {
            location: location.into(),
            part: part.into(),
            description: description.into(),
            qty: Amount::default(),
            uom: String::new(),
            cost: Amount::default(),
        }
    }

    #[test]
    fn test_sort_by_location_then_part() {
        let mut rows = vec![
            row("Main", "B", ""),
            row("Annex", "Z", ""),
            row("Main", "A", ""),
        ];
        sort_rows(&mut rows);

        let keys: Vec<_> = rows.iter().map(|r| (r.location.as_str(), r.part.as_str())).collect();
        assert_eq!(keys, vec![("Annex", "Z"), ("Main", "A"), ("Main", "B")]);
    }

    #[test]
    fn test_ordinal_comparison() {
        let mut rows = vec![row("main", "", ""), row("Main", "", ""), row("Zeta", "", "")];
        sort_rows(&mut rows);

        let locations: Vec<_> = rows.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(locations, vec!["Main", "Zeta", "main"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut rows = vec![
            row("Main", "A", "first"),
            row("Annex", "A", ""),
            row("Main", "A", "second"),
            row("Main", "A", "third"),
        ];
        sort_rows(&mut rows);

        let descriptions: Vec<_> = rows[1..].iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, vec!["first", "second", "third"]);
    }
}
