//! Periodic resampling of a price series inside an interval.
//!
//! Grid dates are `begin + k * period` for every k with the date strictly
//! before `interval.end`. Each grid date takes the series entry at its left
//! insertion point, i.e. the first entry dated on or after the grid date.
//! A missing date (weekend, holiday) therefore always resolves forward.

use crate::domain::interval::{add_months, Interval, IntervalError};
use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ResampleError {
    #[error("grid date {date} is after the last available price ({last:?})")]
    IndexOutOfRange {
        date: NaiveDate,
        last: Option<NaiveDate>,
    },

    #[error("resampling period must be at least one month")]
    ZeroPeriod,

    #[error("grid date overflow: {0}")]
    DateOverflow(String),
}

impl From<IntervalError> for ResampleError {
    fn from(e: IntervalError) -> Self {
        ResampleError::DateOverflow(e.to_string())
    }
}

/// Grid dates for `interval` at the given period.
pub fn grid_dates(interval: &Interval, period_months: u32) -> Result<Vec<NaiveDate>, ResampleError> {
    if period_months == 0 {
        return Err(ResampleError::ZeroPeriod);
    }
    let mut dates = Vec::new();
    let mut k: u32 = 0;
    loop {
        let date = add_months(interval.begin(), k * period_months)?;
        if date >= interval.end() {
            break;
        }
        dates.push(date);
        k += 1;
    }
    Ok(dates)
}

/// Selected `(date, price)` points, dated as they appear in the series.
pub fn resample_points(
    series: &PriceSeries,
    interval: &Interval,
    period_months: u32,
) -> Result<Vec<(NaiveDate, f64)>, ResampleError> {
    grid_dates(interval, period_months)?
        .into_iter()
        .map(|date| {
            series
                .get(series.insertion_index(date))
                .ok_or(ResampleError::IndexOutOfRange {
                    date,
                    last: series.last_date(),
                })
        })
        .collect()
}

/// Prices at the grid dates of `interval`.
pub fn resample(
    series: &PriceSeries,
    interval: &Interval,
    period_months: u32,
) -> Result<Vec<f64>, ResampleError> {
    Ok(resample_points(series, interval, period_months)?
        .into_iter()
        .map(|(_, price)| price)
        .collect())
}
