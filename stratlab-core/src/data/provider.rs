//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over data sources (Yahoo Finance, CSV
//! files, synthetic series) so the session can swap implementations and
//! tests can inject a mock.

use crate::domain::{PriceSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output as-is.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid price data: {0}")]
    Validation(#[from] SeriesError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which price of a monthly bar to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    #[default]
    Close,
    AdjClose,
}

/// Source of monthly price histories.
///
/// Implementations block for the duration of the fetch. Retries and
/// timeouts are the implementation's business.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Monthly prices for `ticker` from `since` onward, ascending by date.
    fn fetch_monthly_prices(&self, ticker: &str, since: NaiveDate)
        -> Result<PriceSeries, DataError>;
}
