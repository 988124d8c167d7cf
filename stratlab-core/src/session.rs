//! Investing session — the stateful front door used by the CLI or a UI.
//!
//! Holds the currently loaded stock and the active analysis interval. The
//! two slots are independent: neither setter validates against the other,
//! so an interval wider than the loaded history shows up downstream as
//! failed or missing windows rather than an error here.
//!
//! The session is an ordinary value; callers own it and pass it around.
//! Setters take `&mut self`, so a host sharing one session between threads
//! has to put it behind a lock.

use crate::config::EngineConfig;
use crate::data::{DataError, PriceProvider};
use crate::distribution::{
    compare, compute_distribution, CompareError, Comparison, DistributionError,
    DistributionOptions, GainDistribution,
};
use crate::domain::{Interval, IntervalError, PriceSeries, Stock};
use crate::strategy::GainStrategy;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("no stock loaded; call set_ticker first")]
    NoStockLoaded,

    #[error("no interval set; call set_interval first")]
    NoIntervalSet,

    #[error("invalid interval: {0}")]
    InvalidInterval(#[from] IntervalError),

    #[error("data provider error: {0}")]
    Data(DataError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Compare(#[from] CompareError),
}

impl From<DataError> for SessionError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::UnknownTicker { ticker } => SessionError::UnknownTicker(ticker),
            other => SessionError::Data(other),
        }
    }
}

pub struct InvestingSession {
    provider: Box<dyn PriceProvider>,
    config: EngineConfig,
    stock: Option<Stock>,
    interval: Option<Interval>,
}

impl InvestingSession {
    pub fn new(provider: Box<dyn PriceProvider>, config: EngineConfig) -> Self {
        Self {
            provider,
            config,
            stock: None,
            interval: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Load `ticker`'s full history, unless it is already loaded.
    ///
    /// On failure the previously loaded stock stays in place.
    pub fn set_ticker(&mut self, ticker: &str) -> Result<(), SessionError> {
        if self.ticker() == Some(ticker) {
            return Ok(());
        }
        let series = self
            .provider
            .fetch_monthly_prices(ticker, self.config.history_start)?;
        info!(
            ticker,
            provider = self.provider_name(),
            months = series.len(),
            first = ?series.first_date(),
            last = ?series.last_date(),
            "loaded price history"
        );
        self.stock = Some(Stock::new(ticker, series));
        Ok(())
    }

    /// Analysis interval `[Jan 1 begin_year, Jan 1 end_year]`.
    pub fn set_interval(&mut self, begin_year: i32, end_year: i32) -> Result<(), SessionError> {
        self.interval = Some(Interval::from_years(begin_year, end_year)?);
        Ok(())
    }

    pub fn ticker(&self) -> Option<&str> {
        self.stock.as_ref().map(|s| s.ticker.as_str())
    }

    pub fn stock(&self) -> Option<&Stock> {
        self.stock.as_ref()
    }

    pub fn interval(&self) -> Option<Interval> {
        self.interval
    }

    pub fn interval_dates(&self) -> Result<(NaiveDate, NaiveDate), SessionError> {
        let iv = self.interval.ok_or(SessionError::NoIntervalSet)?;
        Ok((iv.begin(), iv.end()))
    }

    pub fn get_timeseries(&self) -> Result<&PriceSeries, SessionError> {
        self.stock
            .as_ref()
            .map(|s| &s.series)
            .ok_or(SessionError::NoStockLoaded)
    }

    /// Loaded history restricted to the active interval, both ends included.
    pub fn selected_timeseries(&self) -> Result<PriceSeries, SessionError> {
        let series = self.get_timeseries()?;
        let (begin, end) = self.interval_dates()?;
        Ok(series.between(begin, end))
    }

    pub fn calculate_distribution(
        &self,
        strategy: &dyn GainStrategy,
        window_years: u32,
        options: DistributionOptions,
    ) -> Result<GainDistribution, SessionError> {
        let stock = self.stock.as_ref().ok_or(SessionError::NoStockLoaded)?;
        let interval = self.interval.ok_or(SessionError::NoIntervalSet)?;
        Ok(compute_distribution(
            stock,
            &interval,
            strategy,
            window_years,
            options,
            &self.config,
        )?)
    }

    /// Distributions of two strategies over the same windows, joined.
    pub fn compare_strategies(
        &self,
        a: &dyn GainStrategy,
        b: &dyn GainStrategy,
        window_years: u32,
        options: DistributionOptions,
    ) -> Result<Comparison, SessionError> {
        let dist_a = self.calculate_distribution(a, window_years, options)?;
        let dist_b = self.calculate_distribution(b, window_years, options)?;
        Ok(compare(&dist_a, &dist_b)?)
    }
}
