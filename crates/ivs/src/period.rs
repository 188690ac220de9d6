//! Reporting period

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

/// Days subtracted from the run date before picking the quarter
///
/// Reports are produced shortly after a quarter closes and belong to it.
pub const INVENTORY_OFFSET_DAYS: u64 = 15;

/// The quarter a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportingPeriod {
    year: i32,
    quarter: u8,
}

impl ReportingPeriod {
    /// Period for a report run on `today`
    pub fn for_run_date(today: NaiveDate) -> Self {
        let inventoried = today
            .checked_sub_days(Days::new(INVENTORY_OFFSET_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self::containing(inventoried)
    }

    /// Period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month() - 1) / 3 + 1) as u8,
        }
    }

    /// Quarter number, 1 to 4
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Label such as `3rd Quarter 2024`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ordinal = match self.quarter {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            _ => "4th",
        };
        write!(f, "{} Quarter {}", ordinal, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_for_every_month() {
        let expected = [1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4];
        for (month, quarter) in (1..=12).zip(expected) {
            let period = ReportingPeriod::containing(date(2024, month, 1));
            assert_eq!(period.quarter(), quarter, "month {}", month);
        }
    }

    #[test]
    fn test_offset_crosses_year_boundary() {
        let period = ReportingPeriod::for_run_date(date(2024, 1, 10));
        assert_eq!(period.label(), "4th Quarter 2023");
    }

    #[test]
    fn test_offset_crosses_quarter_boundary() {
        assert_eq!(
            ReportingPeriod::for_run_date(date(2024, 4, 15)).label(),
            "1st Quarter 2024"
        );
        assert_eq!(
            ReportingPeriod::for_run_date(date(2024, 4, 16)).label(),
            "2nd Quarter 2024"
        );
        assert_eq!(
            ReportingPeriod::for_run_date(date(2024, 10, 5)).label(),
            "3rd Quarter 2024"
        );
    }

    #[test]
    fn test_end_of_quarter_months() {
        // March, June, September and December stay in their own quarter
        assert_eq!(ReportingPeriod::for_run_date(date(2024, 3, 31)).quarter(), 1);
        assert_eq!(ReportingPeriod::for_run_date(date(2024, 6, 30)).quarter(), 2);
        assert_eq!(ReportingPeriod::for_run_date(date(2024, 9, 30)).quarter(), 3);
        assert_eq!(ReportingPeriod::for_run_date(date(2024, 12, 31)).quarter(), 4);
    }
}
