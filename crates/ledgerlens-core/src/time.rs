//! Report periods and the half-open date ranges they resolve to

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Half-open date interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Check if a date falls inside the range (start inclusive, end exclusive)
    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date < self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A calendar month or a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    /// Validated month period; month is 1-based
    pub fn month(year: i32, month: u32) -> CoreResult<Self> {
        check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidPeriod {
                message: format!("month must be between 1 and 12, got {}", month),
            });
        }
        let period = Period::Month { year, month };
        period.range()?;
        Ok(period)
    }

    /// Validated year period
    pub fn year(year: i32) -> CoreResult<Self> {
        check_year(year)?;
        let period = Period::Year(year);
        period.range()?;
        Ok(period)
    }

    /// Resolve the half-open date window the period covers
    pub fn range(&self) -> CoreResult<DateRange> {
        let (start, end) = match *self {
            Period::Month { year, month } => {
                let (next_year, next_month) = if month == 12 { (year.saturating_add(1), 1) } else { (year, month + 1) };
                (first_of_month(year, month)?, first_of_month(next_year, next_month)?)
            }
            Period::Year(year) => (first_of_month(year, 1)?, first_of_month(year.saturating_add(1), 1)?),
        };
        Ok(DateRange::new(start, end))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Year(year) => write!(f, "{:04}", year),
        }
    }
}

fn check_year(year: i32) -> CoreResult<()> {
    if year < 1 {
        return Err(CoreError::InvalidPeriod {
            message: format!("year must be a positive integer, got {}", year),
        });
    }
    Ok(())
}

fn first_of_month(year: i32, month: u32) -> CoreResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| CoreError::InvalidPeriod {
        message: format!("{:04}-{:02} is outside the supported calendar", year, month),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_range_is_half_open() {
        let range = Period::month(2024, 3).unwrap().range().unwrap();
        assert_eq!(range.start, date(2024, 3, 1));
        assert_eq!(range.end, date(2024, 4, 1));

        assert!(range.contains(&date(2024, 3, 1)));
        assert!(range.contains(&date(2024, 3, 31)));
        assert!(!range.contains(&date(2024, 4, 1)));
        assert!(!range.contains(&date(2024, 2, 29)));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let range = Period::month(2023, 12).unwrap().range().unwrap();
        assert_eq!(range.start, date(2023, 12, 1));
        assert_eq!(range.end, date(2024, 1, 1));
        assert!(range.contains(&date(2023, 12, 31)));
    }

    #[test]
    fn test_year_range() {
        let range = Period::year(2024).unwrap().range().unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2025, 1, 1));
        assert!(range.contains(&date(2024, 12, 31)));
        assert!(!range.contains(&date(2025, 1, 1)));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(Period::month(2024, 0), Err(CoreError::InvalidPeriod { .. })));
        assert!(matches!(Period::month(2024, 13), Err(CoreError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_invalid_year() {
        assert!(matches!(Period::year(0), Err(CoreError::InvalidPeriod { .. })));
        assert!(matches!(Period::year(-5), Err(CoreError::InvalidPeriod { .. })));
        assert!(matches!(Period::year(i32::MAX), Err(CoreError::InvalidPeriod { .. })));
        assert!(matches!(Period::month(i32::MAX, 12), Err(CoreError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::month(2024, 3).unwrap().to_string(), "2024-03");
        assert_eq!(Period::year(2024).unwrap().to_string(), "2024");
    }
}
