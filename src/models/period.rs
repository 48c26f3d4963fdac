//! Monthly budget periods
//!
//! Budgets are evaluated per calendar month, written as `YYYY-MM`.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BudgetPeriod {
    year: i32,
    month: u32,
}

impl BudgetPeriod {
    /// Create a monthly period; `None` if the month is out of range
    pub fn monthly(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The period containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Get the current monthly period (local time)
    pub fn current_month() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Get the start date of this period
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Get the end date of this period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Get the next period
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Get the previous period
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse a period string
    ///
    /// Formats:
    /// - "2025-01"
    /// - "current", "last", "next" (relative to today)
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        match s.to_lowercase().as_str() {
            "current" | "this" => return Ok(Self::current_month()),
            "last" | "prev" | "previous" => return Ok(Self::current_month().prev()),
            "next" => return Ok(Self::current_month().next()),
            _ => {}
        }

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::monthly(year, month).ok_or(PeriodParseError::InvalidMonth(month))
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BudgetPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BudgetPeriod {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BudgetPeriod> for String {
    fn from(period: BudgetPeriod) -> Self {
        period.to_string()
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_bounds() {
        let feb = BudgetPeriod::monthly(2024, 2).unwrap();
        assert_eq!(feb.start_date(), date(2024, 2, 1));
        assert_eq!(feb.end_date(), date(2024, 2, 29));

        let dec = BudgetPeriod::monthly(2025, 12).unwrap();
        assert_eq!(dec.end_date(), date(2025, 12, 31));
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(BudgetPeriod::monthly(2025, 0).is_none());
        assert!(BudgetPeriod::monthly(2025, 13).is_none());
        assert_eq!(
            BudgetPeriod::parse("2025-13"),
            Err(PeriodParseError::InvalidMonth(13))
        );
    }

    #[test]
    fn test_navigation_wraps_years() {
        let dec = BudgetPeriod::monthly(2024, 12).unwrap();
        assert_eq!(dec.next(), BudgetPeriod::monthly(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn test_contains_and_of() {
        let jan = BudgetPeriod::monthly(2025, 1).unwrap();
        assert!(jan.contains(date(2025, 1, 31)));
        assert!(!jan.contains(date(2025, 2, 1)));
        assert!(!jan.contains(date(2024, 1, 15)));
        assert_eq!(BudgetPeriod::of(date(2025, 1, 15)), jan);
    }

    #[test]
    fn test_parse_and_display() {
        let period = BudgetPeriod::parse("2025-03").unwrap();
        assert_eq!(period.to_string(), "2025-03");
        assert!(BudgetPeriod::parse("March").is_err());
        assert_eq!(
            BudgetPeriod::parse("current").unwrap(),
            BudgetPeriod::current_month()
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let period = BudgetPeriod::monthly(2025, 1).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2025-01\"");
        let back: BudgetPeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
    }
}
