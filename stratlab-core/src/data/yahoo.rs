//! Yahoo Finance monthly price provider.
//!
//! Fetches monthly bars from Yahoo's v8 chart API with `interval=1mo`.
//! Handles retries with exponential backoff and response parsing. The last
//! bar is the month still in progress and is dropped.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; the CSV provider is the fallback.

use super::provider::{DataError, PriceField, PriceProvider};
use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds, at the time of the request.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    field: PriceField,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(field: PriceField) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::ProviderUnavailable(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            field,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Build the chart API URL for a ticker from `since` until now.
    fn chart_url(ticker: &str, since: NaiveDate) -> String {
        let start_ts = since.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = chrono::Utc::now().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval=1mo\
             &includeAdjustedClose=true"
        )
    }

    /// Parse the chart API response into a monthly series.
    fn parse_response(
        ticker: &str,
        field: PriceField,
        resp: ChartResponse,
    ) -> Result<PriceSeries, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::UnknownTicker {
                        ticker: ticker.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data.timestamp.ok_or_else(|| DataError::UnknownTicker {
            ticker: ticker.to_string(),
        })?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let column: Vec<Option<f64>> = match field {
            PriceField::Open => quote.open,
            PriceField::Close => quote.close,
            PriceField::AdjClose => data
                .indicators
                .adjclose
                .and_then(|v| v.into_iter().next())
                .map(|a| a.adjclose)
                .ok_or_else(|| DataError::ResponseFormatChanged("no adjclose data".into()))?,
        };

        let mut points: Vec<(NaiveDate, f64)> = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = bar_date(ts, data.meta.gmtoffset).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            // Skip months with no price (delisted stretches, partial data)
            let Some(price) = column.get(i).copied().flatten() else {
                continue;
            };

            // Yahoo occasionally repeats the current month as an extra row
            if points.last().is_some_and(|(last, _)| *last >= date) {
                continue;
            }
            points.push((date, price));
        }

        // The final bar is the month still trading
        points.pop();

        if points.is_empty() {
            return Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            });
        }

        Ok(PriceSeries::from_points(points)?)
    }

    /// Execute the HTTP request with retry logic.
    fn fetch_with_retry(&self, ticker: &str, since: NaiveDate) -> Result<PriceSeries, DataError> {
        let url = Self::chart_url(ticker, since);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                info!(ticker, attempt, ?delay, "retrying Yahoo request");
                std::thread::sleep(delay);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(DataError::UnknownTicker {
                            ticker: ticker.to_string(),
                        });
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        warn!(ticker, retry_after, "rate limited by Yahoo");
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::FORBIDDEN
                        || status == reqwest::StatusCode::UNAUTHORIZED
                    {
                        return Err(DataError::ProviderUnavailable(format!(
                            "HTTP {status}: Yahoo Finance refused the request"
                        )));
                    }

                    if !status.is_success() {
                        last_error = Some(DataError::ProviderUnavailable(format!(
                            "HTTP {status} for {ticker}"
                        )));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {ticker}: {e}"
                        ))
                    })?;

                    return Self::parse_response(ticker, self.field, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::ProviderUnavailable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::ProviderUnavailable(e.to_string()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DataError::ProviderUnavailable("max retries exceeded".into())))
    }
}

/// Calendar date of a monthly bar.
///
/// Bars are stamped at exchange-local midnight, so a European January bar
/// is Dec 31 in UTC. `gmtoffset` is the offset at request time and can be
/// an hour off across DST; rounding to the nearest local midnight absorbs that.
fn bar_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    const HALF_DAY: i64 = 12 * 60 * 60;
    let local = ts.checked_add(gmtoffset)?.checked_add(HALF_DAY)?;
    chrono::DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive())
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_monthly_prices(
        &self,
        ticker: &str,
        since: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        self.fetch_with_retry(ticker, since)
    }
}
