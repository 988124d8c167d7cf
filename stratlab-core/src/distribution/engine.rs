//! Distribution engine: partition, resample, evaluate, transform.

use super::transform::{annualize, to_percentage};
use super::{DistributionOptions, GainDistribution, WindowError, WindowGain, SCHEMA_VERSION};
use crate::config::EngineConfig;
use crate::domain::{Interval, Stock};
use crate::resample::resample;
use crate::strategy::GainStrategy;
use crate::window::{partition, PartitionError, WindowSpec};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that abort a whole distribution. Per-window problems never do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    #[error("window duration must be at least one year")]
    ZeroDuration,

    #[error("buy period must be at least one month")]
    ZeroBuyPeriod,

    #[error(transparent)]
    Partition(#[from] PartitionError),
}

/// Gain of `strategy` over every `window_years`-long window inside `interval`.
///
/// Always recomputed from the stock's series; nothing is cached.
pub fn compute_distribution(
    stock: &Stock,
    interval: &Interval,
    strategy: &dyn GainStrategy,
    window_years: u32,
    options: DistributionOptions,
    config: &EngineConfig,
) -> Result<GainDistribution, DistributionError> {
    if window_years == 0 {
        return Err(DistributionError::ZeroDuration);
    }
    if config.buy_period_months == 0 {
        return Err(DistributionError::ZeroBuyPeriod);
    }

    let spec = WindowSpec::years(window_years)?
        .with_step(config.step_months)
        .with_boundary(config.window_boundary);
    let windows = partition(interval, &spec)?;

    debug!(
        ticker = %stock.ticker,
        strategy = strategy.name(),
        windows = windows.len(),
        %interval,
        "computing gain distribution"
    );

    let entries: Vec<WindowGain> = windows
        .into_iter()
        .map(|window| {
            let gain = window_gain(stock, &window, strategy, window_years, options, config);
            if let Err(err) = &gain {
                warn!(ticker = %stock.ticker, %window, error = %err, "window skipped");
            }
            WindowGain { window, gain }
        })
        .collect();

    Ok(GainDistribution {
        schema_version: SCHEMA_VERSION,
        ticker: stock.ticker.clone(),
        strategy: strategy.name().to_string(),
        window_years,
        options,
        engine: *config,
        dataset_hash: stock.series.dataset_hash(),
        entries,
    })
}

fn window_gain(
    stock: &Stock,
    window: &Interval,
    strategy: &dyn GainStrategy,
    window_years: u32,
    options: DistributionOptions,
    config: &EngineConfig,
) -> Result<f64, WindowError> {
    let prices = resample(&stock.series, window, config.buy_period_months)?;
    let gain = apply_options(strategy.gain(&prices)?, window_years, options);
    // a negative ratio annualizes to NaN; overflow gives infinity
    if gain.is_finite() {
        Ok(gain)
    } else {
        Err(WindowError::NonFiniteGain)
    }
}

/// Annualize first, then rescale.
fn apply_options(gain: f64, window_years: u32, options: DistributionOptions) -> f64 {
    let gain = if options.annualize {
        annualize(gain, window_years)
    } else {
        gain
    };
    if options.as_percentage {
        to_percentage(gain)
    } else {
        gain
    }
}
