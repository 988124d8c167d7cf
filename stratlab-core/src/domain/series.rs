//! Price series and the stock that owns it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("{dates} dates but {prices} prices")]
    LengthMismatch { dates: usize, prices: usize },

    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    NotIncreasing { previous: NaiveDate, next: NaiveDate },
}

/// Date-indexed prices with strictly increasing dates.
///
/// Read-only once built. Everything downstream of the provider borrows it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSeries {
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl TryFrom<RawSeries> for PriceSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.dates, raw.prices)
    }
}

impl PriceSeries {
    pub fn new(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self, SeriesError> {
        if dates.len() != prices.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                prices: prices.len(),
            });
        }
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SeriesError::NotIncreasing {
                previous: pair[0],
                next: pair[1],
            });
        }
        Ok(Self { dates, prices })
    }

    pub fn from_points<I>(points: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, prices) = points.into_iter().unzip();
        Self::new(dates, prices)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<(NaiveDate, f64)> {
        Some((*self.dates.get(index)?, *self.prices.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.prices.iter().copied())
    }

    /// Left insertion point of `date`: index of the first entry dated on or
    /// after it. Equals `len()` when `date` is past the last entry.
    pub fn insertion_index(&self, date: NaiveDate) -> usize {
        self.dates.partition_point(|d| *d < date)
    }

    /// Entries with `begin <= date <= end`.
    pub fn between(&self, begin: NaiveDate, end: NaiveDate) -> PriceSeries {
        let lo = self.insertion_index(begin);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);
        PriceSeries {
            dates: self.dates[lo..hi].to_vec(),
            prices: self.prices[lo..hi].to_vec(),
        }
    }

    /// BLAKE3 over every (date, price) pair, for fingerprinting results.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (date, price) in self.iter() {
            hasher.update(date.to_string().as_bytes());
            hasher.update(&price.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// An instrument and its full monthly price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub ticker: String,
    pub series: PriceSeries,
}

impl Stock {
    pub fn new(ticker: impl Into<String>, series: PriceSeries) -> Self {
        Self {
            ticker: ticker.into(),
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> PriceSeries {
        PriceSeries::new(
            vec![d(2020, 1, 1), d(2020, 2, 3), d(2020, 3, 2)],
            vec![10.0, 11.0, 12.0],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![d(2020, 1, 1), d(2020, 1, 1)], vec![1.0, 2.0]);
        assert!(matches!(err, Err(SeriesError::NotIncreasing { .. })));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = PriceSeries::new(vec![d(2020, 1, 1)], vec![1.0, 2.0]);
        assert_eq!(
            err,
            Err(SeriesError::LengthMismatch {
                dates: 1,
                prices: 2
            })
        );
    }

    #[test]
    fn insertion_index_picks_at_or_after() {
        let s = sample();
        assert_eq!(s.insertion_index(d(2019, 12, 1)), 0);
        assert_eq!(s.insertion_index(d(2020, 1, 1)), 0);
        // Feb 1 is absent: the later Feb 3 entry wins, not the closer-by-a-month Jan 1
        assert_eq!(s.insertion_index(d(2020, 2, 1)), 1);
        assert_eq!(s.insertion_index(d(2020, 3, 3)), 3);
    }

    #[test]
    fn between_is_inclusive() {
        let s = sample();
        let sub = s.between(d(2020, 1, 1), d(2020, 2, 3));
        assert_eq!(sub.prices(), &[10.0, 11.0]);
        assert!(s.between(d(2021, 1, 1), d(2022, 1, 1)).is_empty());
    }

    #[test]
    fn dataset_hash_changes_with_prices() {
        let a = sample();
        let b = PriceSeries::new(a.dates().to_vec(), vec![10.0, 11.0, 12.5]).unwrap();
        assert_eq!(a.dataset_hash(), sample().dataset_hash());
        assert_ne!(a.dataset_hash(), b.dataset_hash());
    }

    #[test]
    fn serialization_roundtrip() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        let back: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
