//! Interval — a closed date range, the basic unit of analysis.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("interval begin {begin} must be before end {end}")]
    NotIncreasing { begin: NaiveDate, end: NaiveDate },

    #[error("year {0} is out of range")]
    InvalidYear(i32),

    #[error("date arithmetic overflowed adding {months} months to {date}")]
    Overflow { date: NaiveDate, months: u32 },
}

/// Closed date range `[begin, end]` with `begin < end`.
///
/// Fields are private so the ordering invariant cannot be broken after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    begin: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawInterval {
    begin: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawInterval> for Interval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.begin, raw.end)
    }
}

impl Interval {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Result<Self, IntervalError> {
        if begin >= end {
            return Err(IntervalError::NotIncreasing { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// `[Jan 1 begin_year, Jan 1 end_year]`.
    pub fn from_years(begin_year: i32, end_year: i32) -> Result<Self, IntervalError> {
        let begin = NaiveDate::from_ymd_opt(begin_year, 1, 1)
            .ok_or(IntervalError::InvalidYear(begin_year))?;
        let end =
            NaiveDate::from_ymd_opt(end_year, 1, 1).ok_or(IntervalError::InvalidYear(end_year))?;
        Self::new(begin, end)
    }

    /// Interval starting at `begin` and spanning `length` calendar months.
    pub fn starting_at(begin: NaiveDate, length: u32) -> Result<Self, IntervalError> {
        let end = add_months(begin, length)?;
        Self::new(begin, end)
    }

    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.begin, self.end)
    }
}

/// Calendar month addition; the day is clamped to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, IntervalError> {
    date.checked_add_months(Months::new(months))
        .ok_or(IntervalError::Overflow { date, months })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_empty_and_reversed() {
        assert!(Interval::new(d(2020, 1, 1), d(2020, 1, 1)).is_err());
        assert!(Interval::new(d(2021, 1, 1), d(2020, 1, 1)).is_err());
        assert!(Interval::new(d(2020, 1, 1), d(2020, 1, 2)).is_ok());
    }

    #[test]
    fn from_years_uses_january_first() {
        let iv = Interval::from_years(1990, 2020).unwrap();
        assert_eq!(iv.begin(), d(1990, 1, 1));
        assert_eq!(iv.end(), d(2020, 1, 1));
    }

    #[test]
    fn from_years_rejects_equal_years() {
        assert!(matches!(
            Interval::from_years(2000, 2000),
            Err(IntervalError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn month_addition_clamps_day() {
        assert_eq!(add_months(d(2021, 1, 31), 1).unwrap(), d(2021, 2, 28));
        assert_eq!(add_months(d(2020, 1, 31), 1).unwrap(), d(2020, 2, 29));
    }

    #[test]
    fn deserialize_enforces_ordering() {
        let ok: Interval =
            serde_json::from_str(r#"{"begin":"2000-01-01","end":"2001-01-01"}"#).unwrap();
        assert_eq!(ok.begin(), d(2000, 1, 1));
        let bad = serde_json::from_str::<Interval>(r#"{"begin":"2001-01-01","end":"2000-01-01"}"#);
        assert!(bad.is_err());
    }
}
