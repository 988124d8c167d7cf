//! Gain distributions across sliding windows.
//!
//! A distribution is one entry per partitioned window, in chronological
//! order. A window whose gain could not be computed keeps its slot with the
//! error attached, so "zero return" and "no data" never look alike.

pub mod compare;
pub mod engine;
pub mod export;
pub mod summary;
pub mod transform;

pub use compare::{compare, CompareError, Comparison, PairedGain};
pub use engine::{compute_distribution, DistributionError};
pub use export::{export_csv, export_json, import_json, save_artifacts, ExportError, SCHEMA_VERSION};
pub use summary::{DistributionSummary, Histogram, HistogramBin};
pub use transform::{annualize, deannualize, to_percentage};

use crate::config::EngineConfig;
use crate::domain::Interval;
use crate::resample::ResampleError;
use crate::strategy::StrategyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single window has no gain.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum WindowError {
    #[error("resample failed: {0}")]
    Resample(#[from] ResampleError),

    #[error("strategy failed: {0}")]
    Strategy(#[from] StrategyError),

    #[error("gain is not a finite number")]
    NonFiniteGain,
}

/// Units the gains are expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainScale {
    /// Multiple of money invested, 1.0 = break-even.
    #[default]
    Ratio,
    /// Percent return, 0.0 = break-even.
    Percentage,
}

impl GainScale {
    pub fn break_even(self) -> f64 {
        match self {
            GainScale::Ratio => 1.0,
            GainScale::Percentage => 0.0,
        }
    }
}

/// Post-processing applied to every successful window gain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionOptions {
    /// Replace total gain by its per-year equivalent.
    pub annualize: bool,
    /// Report `(g - 1) * 100` instead of the ratio.
    pub as_percentage: bool,
}

impl DistributionOptions {
    /// Annualized percentage returns, the dashboard's "yearly return" view.
    pub fn yearly_percent() -> Self {
        Self {
            annualize: true,
            as_percentage: true,
        }
    }

    pub fn scale(&self) -> GainScale {
        if self.as_percentage {
            GainScale::Percentage
        } else {
            GainScale::Ratio
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowGain {
    pub window: Interval,
    pub gain: Result<f64, WindowError>,
}

impl WindowGain {
    pub fn value(&self) -> Option<f64> {
        self.gain.as_ref().ok().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainDistribution {
    pub schema_version: u32,
    pub ticker: String,
    pub strategy: String,
    pub window_years: u32,
    pub options: DistributionOptions,
    /// Engine settings in effect: boundary policy, DCA formula, step and buy period.
    #[serde(default)]
    pub engine: EngineConfig,
    /// BLAKE3 of the price series the windows were drawn from.
    #[serde(default)]
    pub dataset_hash: String,
    pub entries: Vec<WindowGain>,
}

impl GainDistribution {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scale(&self) -> GainScale {
        self.options.scale()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowGain> {
        self.entries.iter()
    }

    /// Successful `(window, gain)` pairs in window order.
    pub fn successes(&self) -> impl Iterator<Item = (Interval, f64)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.value().map(|g| (e.window, g)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (Interval, &WindowError)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.gain.as_ref().err().map(|err| (e.window, err)))
    }

    pub fn gains(&self) -> Vec<f64> {
        self.successes().map(|(_, g)| g).collect()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Entry for an exact window. Windows are sorted, so this is a binary search.
    pub fn get(&self, window: &Interval) -> Option<&WindowGain> {
        self.entries
            .binary_search_by(|e| e.window.cmp(window))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn summary(&self) -> DistributionSummary {
        DistributionSummary::from_distribution(self)
    }

    /// BLAKE3 over the identifying metadata and every window result.
    pub fn run_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.ticker.as_bytes());
        hasher.update(self.strategy.as_bytes());
        hasher.update(&self.window_years.to_le_bytes());
        hasher.update(&[self.options.annualize as u8, self.options.as_percentage as u8]);
        hasher.update(&[
            self.engine.window_boundary as u8,
            self.engine.dca_formula as u8,
        ]);
        hasher.update(&self.engine.step_months.to_le_bytes());
        hasher.update(&self.engine.buy_period_months.to_le_bytes());
        hasher.update(self.engine.history_start.to_string().as_bytes());
        hasher.update(self.dataset_hash.as_bytes());
        for entry in &self.entries {
            hasher.update(entry.window.begin().to_string().as_bytes());
            hasher.update(entry.window.end().to_string().as_bytes());
            match &entry.gain {
                Ok(g) => hasher.update(&g.to_le_bytes()),
                Err(e) => hasher.update(e.to_string().as_bytes()),
            };
        }
        hasher.finalize().to_hex().to_string()
    }
}
