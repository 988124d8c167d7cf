//! Session state machine: ticker and interval slots, provider failures,
//! and precondition errors.

use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stratlab_core::data::{DataError, PriceProvider};
use stratlab_core::strategy::{DcaFormula, LumpSum, StrategyKind};
use stratlab_core::{
    DistributionOptions, EngineConfig, InvestingSession, PriceSeries, SessionError,
};

/// Provider serving a flat-then-rising series for "GOOD" and "ALSO",
/// counting every fetch.
struct MockProvider {
    fetches: Arc<AtomicUsize>,
}

impl PriceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_monthly_prices(
        &self,
        ticker: &str,
        _since: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match ticker {
            "GOOD" | "ALSO" => Ok(monthly_series(1990, 30 * 12, |i| 100.0 + i as f64)),
            "DOWN" => Err(DataError::ProviderUnavailable("maintenance".into())),
            _ => Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            }),
        }
    }
}

fn monthly_series(start_year: i32, months: u32, price: impl Fn(u32) -> f64) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap();
    PriceSeries::from_points((0..months).map(|i| {
        (
            start.checked_add_months(chrono::Months::new(i)).unwrap(),
            price(i),
        )
    }))
    .unwrap()
}

fn session() -> (InvestingSession, Arc<AtomicUsize>) {
    let fetches = Arc::new(AtomicUsize::new(0));
    let provider = MockProvider {
        fetches: Arc::clone(&fetches),
    };
    (
        InvestingSession::new(Box::new(provider), EngineConfig::default()),
        fetches,
    )
}

#[test]
fn distribution_before_ticker_fails_with_no_stock() {
    let (mut s, _) = session();
    s.set_interval(1990, 2000).unwrap();
    let err = s
        .calculate_distribution(&LumpSum, 1, DistributionOptions::default())
        .unwrap_err();
    assert!(matches!(err, SessionError::NoStockLoaded));
}

#[test]
fn distribution_before_interval_fails_with_no_interval() {
    let (mut s, _) = session();
    s.set_ticker("GOOD").unwrap();
    let err = s
        .calculate_distribution(&LumpSum, 1, DistributionOptions::default())
        .unwrap_err();
    assert!(matches!(err, SessionError::NoIntervalSet));
}

#[test]
fn timeseries_requires_a_stock() {
    let (s, _) = session();
    assert!(matches!(s.get_timeseries(), Err(SessionError::NoStockLoaded)));
}

#[test]
fn same_ticker_is_not_refetched() {
    let (mut s, fetches) = session();
    s.set_ticker("GOOD").unwrap();
    s.set_ticker("GOOD").unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
    s.set_ticker("ALSO").unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(s.ticker(), Some("ALSO"));
    assert_eq!(s.provider_name(), "mock");
}

#[test]
fn unknown_ticker_keeps_previous_stock() {
    let (mut s, _) = session();
    s.set_ticker("GOOD").unwrap();
    let err = s.set_ticker("NOPE").unwrap_err();
    assert!(matches!(err, SessionError::UnknownTicker(ref t) if t == "NOPE"));
    assert_eq!(s.ticker(), Some("GOOD"));
    assert_eq!(s.get_timeseries().unwrap().len(), 360);
}

#[test]
fn provider_outage_is_not_reported_as_unknown_ticker() {
    let (mut s, _) = session();
    let err = s.set_ticker("DOWN").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Data(DataError::ProviderUnavailable(_))
    ));
    assert!(s.ticker().is_none());
}

#[test]
fn interval_is_january_first_to_january_first() {
    let (mut s, _) = session();
    s.set_interval(1995, 2005).unwrap();
    assert_eq!(
        s.interval_dates().unwrap(),
        (
            NaiveDate::from_ymd_opt(1995, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2005, 1, 1).unwrap()
        )
    );
    assert!(matches!(
        s.set_interval(2005, 2005),
        Err(SessionError::InvalidInterval(_))
    ));
    // failed update leaves the previous interval
    assert_eq!(s.interval().unwrap().begin().to_string(), "1995-01-01");
}

#[test]
fn selected_timeseries_is_inclusive() {
    let (mut s, _) = session();
    s.set_ticker("GOOD").unwrap();
    s.set_interval(1991, 1992).unwrap();
    let sel = s.selected_timeseries().unwrap();
    // Jan 1991 .. Jan 1992 inclusive
    assert_eq!(sel.len(), 13);
}

#[test]
fn interval_wider_than_history_yields_failed_windows_not_error() {
    let (mut s, _) = session();
    s.set_ticker("GOOD").unwrap(); // history ends Dec 2019
    s.set_interval(2015, 2025).unwrap();
    let dist = s
        .calculate_distribution(&LumpSum, 1, DistributionOptions::default())
        .unwrap();
    assert_eq!(dist.len(), 9 * 12 + 1);
    assert!(dist.failed_count() > 0);
    assert!(!dist.gains().is_empty());
}

#[test]
fn compare_two_strategies() {
    let (mut s, _) = session();
    s.set_ticker("GOOD").unwrap();
    s.set_interval(1990, 2000).unwrap();
    let lump = StrategyKind::LumpSum.build(DcaFormula::Harmonic);
    let dca = StrategyKind::DollarCostAverage.build(DcaFormula::Harmonic);
    let cmp = s
        .compare_strategies(lump.as_ref(), dca.as_ref(), 1, DistributionOptions::default())
        .unwrap();
    assert_eq!(cmp.pairs.len(), 109);
    assert_eq!(cmp.summary_a.windows, 109);
    assert_eq!(cmp.summary_b.failed, 0);
    // steadily rising prices: investing everything up front always wins
    assert_eq!(cmp.b_better_share(), Some(0.0));
}
