//! Sliding-window partitioning of an analysis interval.
//!
//! Windows have a fixed calendar length and advance by a fixed calendar step
//! (one month by default). Which windows at the tail are kept depends on
//! [`WindowBoundary`]; the choice changes the window count by one and must
//! stay explicit.

use crate::domain::interval::{add_months, Interval, IntervalError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default step between consecutive window begins.
pub const DEFAULT_STEP_MONTHS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("window length must be at least one month")]
    ZeroLength,

    #[error("window step must be at least one month")]
    ZeroStep,

    #[error("window of {years} years is too long to express in months")]
    DurationOverflow { years: u32 },

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Tail policy: how a window's end is compared with the overall end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowBoundary {
    /// Keep windows with `end <= overall.end`.
    #[default]
    Inclusive,
    /// Keep windows with `end < overall.end`; drops a window that ends
    /// exactly on the overall end.
    Exclusive,
}

impl WindowBoundary {
    fn admits(self, window_end: chrono::NaiveDate, overall_end: chrono::NaiveDate) -> bool {
        match self {
            WindowBoundary::Inclusive => window_end <= overall_end,
            WindowBoundary::Exclusive => window_end < overall_end,
        }
    }
}

/// Shape of the sliding window, in calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub length_months: u32,
    pub step_months: u32,
    pub boundary: WindowBoundary,
}

impl WindowSpec {
    pub fn years(years: u32) -> Result<Self, PartitionError> {
        let length_months = years
            .checked_mul(12)
            .ok_or(PartitionError::DurationOverflow { years })?;
        Ok(Self {
            length_months,
            step_months: DEFAULT_STEP_MONTHS,
            boundary: WindowBoundary::default(),
        })
    }

    pub fn with_step(mut self, step_months: u32) -> Self {
        self.step_months = step_months;
        self
    }

    pub fn with_boundary(mut self, boundary: WindowBoundary) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Split `overall` into windows `[b, b+length]`, `[b+step, b+step+length]`, ...
///
/// Each begin is the previous begin plus `step`; each end is its own begin
/// plus `length`. Stops at the first window the boundary policy rejects.
pub fn partition(overall: &Interval, spec: &WindowSpec) -> Result<Vec<Interval>, PartitionError> {
    if spec.length_months == 0 {
        return Err(PartitionError::ZeroLength);
    }
    if spec.step_months == 0 {
        return Err(PartitionError::ZeroStep);
    }

    let mut windows = Vec::new();
    let mut begin = overall.begin();
    loop {
        let window = Interval::starting_at(begin, spec.length_months)?;
        if !spec.boundary.admits(window.end(), overall.end()) {
            break;
        }
        windows.push(window);
        begin = add_months(begin, spec.step_months)?;
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn one_year_windows_over_two_years() {
        let overall = Interval::from_years(2000, 2002).unwrap();
        let windows = partition(&overall, &WindowSpec::years(1).unwrap()).unwrap();
        // begins Jan 2000 .. Jan 2001 inclusive
        assert_eq!(windows.len(), 13);
        assert_eq!(windows[0].begin(), d(2000, 1, 1));
        assert_eq!(windows[0].end(), d(2001, 1, 1));
        assert_eq!(windows.last().unwrap().end(), d(2002, 1, 1));
    }

    #[test]
    fn exclusive_boundary_drops_the_exact_fit() {
        let overall = Interval::from_years(2000, 2002).unwrap();
        let spec = WindowSpec::years(1).unwrap().with_boundary(WindowBoundary::Exclusive);
        let windows = partition(&overall, &spec).unwrap();
        assert_eq!(windows.len(), 12);
        assert_eq!(windows.last().unwrap().end(), d(2001, 12, 1));
    }

    #[test]
    fn window_equal_to_interval_yields_one_inclusive_zero_exclusive() {
        let overall = Interval::from_years(2000, 2005).unwrap();
        assert_eq!(partition(&overall, &WindowSpec::years(5).unwrap()).unwrap().len(), 1);
        let spec = WindowSpec::years(5).unwrap().with_boundary(WindowBoundary::Exclusive);
        assert!(partition(&overall, &spec).unwrap().is_empty());
    }

    #[test]
    fn window_longer_than_interval_is_empty() {
        let overall = Interval::from_years(2000, 2003).unwrap();
        assert!(partition(&overall, &WindowSpec::years(5).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn custom_step() {
        let overall = Interval::from_years(2000, 2003).unwrap();
        let windows = partition(&overall, &WindowSpec::years(1).unwrap().with_step(6)).unwrap();
        let begins: Vec<_> = windows.iter().map(|w| w.begin()).collect();
        assert_eq!(
            begins,
            vec![d(2000, 1, 1), d(2000, 7, 1), d(2001, 1, 1), d(2001, 7, 1), d(2002, 1, 1)]
        );
    }

    #[test]
    fn zero_length_or_step_rejected() {
        let overall = Interval::from_years(2000, 2003).unwrap();
        assert_eq!(
            partition(&overall, &WindowSpec::years(0).unwrap()),
            Err(PartitionError::ZeroLength)
        );
        assert_eq!(
            partition(&overall, &WindowSpec::years(1).unwrap().with_step(0)),
            Err(PartitionError::ZeroStep)
        );
    }

    #[test]
    fn huge_year_count_is_an_error_not_a_panic() {
        assert_eq!(
            WindowSpec::years(400_000_000),
            Err(PartitionError::DurationOverflow { years: 400_000_000 })
        );
        assert_eq!(WindowSpec::years(u32::MAX / 12).unwrap().length_months, u32::MAX / 12 * 12);
    }

    #[test]
    fn window_past_the_calendar_is_an_interval_error() {
        let overall = Interval::from_years(2000, 2003).unwrap();
        let spec = WindowSpec::years(u32::MAX / 12).unwrap();
        assert!(matches!(
            partition(&overall, &spec),
            Err(PartitionError::Interval(IntervalError::Overflow { .. }))
        ));
    }
}
