//! Synthetic monthly prices for offline runs and demos.
//!
//! A seeded geometric random walk starting at 100.0 on the first of the
//! `since` month. The seed comes from the ticker, so the same ticker always
//! yields the same series.

use super::provider::{DataError, PriceProvider};
use crate::domain::PriceSeries;
use chrono::{Datelike, Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    /// Last month generated (exclusive).
    until: NaiveDate,
    /// Mean monthly return.
    drift: f64,
    /// Half-width of the uniform monthly shock.
    shock: f64,
}

impl SyntheticProvider {
    pub fn new(until: NaiveDate) -> Self {
        Self {
            until,
            drift: 0.006,
            shock: 0.05,
        }
    }

    pub fn with_drift(mut self, drift: f64, shock: f64) -> Self {
        self.drift = drift;
        self.shock = shock;
        self
    }

    pub fn generate(&self, ticker: &str, since: NaiveDate) -> PriceSeries {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut points = Vec::new();
        let mut price = 100.0_f64;
        let mut date = since.with_day(1).unwrap_or(since);
        while date < self.until {
            points.push((date, price));
            let shock = if self.shock > 0.0 {
                rng.gen_range(-self.shock..self.shock)
            } else {
                0.0
            };
            price *= 1.0 + self.drift + shock;
            match date.checked_add_months(Months::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }
        PriceSeries::from_points(points).unwrap_or_default()
    }
}

impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_monthly_prices(
        &self,
        ticker: &str,
        since: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        if ticker.trim().is_empty() {
            return Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            });
        }
        Ok(self.generate(ticker, since))
    }
}
