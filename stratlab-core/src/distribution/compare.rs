//! Side-by-side comparison of two strategies' distributions.

use super::summary::{value_range, DistributionSummary, Histogram};
use super::{GainDistribution, GainScale};
use crate::domain::Interval;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("distributions use different scales ({a:?} vs {b:?})")]
    ScaleMismatch { a: GainScale, b: GainScale },

    #[error("distributions use different window lengths ({a}y vs {b}y)")]
    WindowMismatch { a: u32, b: u32 },
}

/// Gains of both strategies over the same window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedGain {
    pub window: Interval,
    pub a: f64,
    pub b: f64,
}

impl PairedGain {
    pub fn b_better(&self) -> bool {
        self.a < self.b
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub strategy_a: String,
    pub strategy_b: String,
    pub scale: GainScale,
    /// Windows where both strategies produced a gain, in window order.
    pub pairs: Vec<PairedGain>,
    /// Shared `(min, max)` over both sides, for a common axis.
    pub range: Option<(f64, f64)>,
    /// Each side over all of its own windows, failures included.
    pub summary_a: DistributionSummary,
    pub summary_b: DistributionSummary,
}

impl Comparison {
    /// Share of paired windows where `b` beat `a`.
    pub fn b_better_share(&self) -> Option<f64> {
        if self.pairs.is_empty() {
            return None;
        }
        let better = self.pairs.iter().filter(|p| p.b_better()).count();
        Some(better as f64 / self.pairs.len() as f64)
    }

    /// Mean of `b - a` over paired windows.
    pub fn mean_difference(&self) -> Option<f64> {
        if self.pairs.is_empty() {
            return None;
        }
        let total: f64 = self.pairs.iter().map(|p| p.b - p.a).sum();
        Some(total / self.pairs.len() as f64)
    }

    /// Histograms of both sides binned over the shared range.
    pub fn histograms(&self, bins: usize) -> (Histogram, Histogram) {
        let range = self.range.unwrap_or((0.0, 0.0));
        let a: Vec<f64> = self.pairs.iter().map(|p| p.a).collect();
        let b: Vec<f64> = self.pairs.iter().map(|p| p.b).collect();
        let be = self.scale.break_even();
        (
            Histogram::from_values(&a, bins, range, be),
            Histogram::from_values(&b, bins, range, be),
        )
    }
}

/// Join two distributions on their windows.
///
/// Windows that failed on either side are left out of the pairs.
pub fn compare(a: &GainDistribution, b: &GainDistribution) -> Result<Comparison, CompareError> {
    if a.scale() != b.scale() {
        return Err(CompareError::ScaleMismatch {
            a: a.scale(),
            b: b.scale(),
        });
    }
    if a.window_years != b.window_years {
        return Err(CompareError::WindowMismatch {
            a: a.window_years,
            b: b.window_years,
        });
    }

    // both sides are sorted by window, so a merge join suffices
    let left: Vec<(Interval, f64)> = a.successes().collect();
    let right: Vec<(Interval, f64)> = b.successes().collect();
    let mut pairs = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].0.cmp(&right[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                pairs.push(PairedGain {
                    window: left[i].0,
                    a: left[i].1,
                    b: right[j].1,
                });
                i += 1;
                j += 1;
            }
        }
    }

    let all: Vec<f64> = pairs.iter().flat_map(|p| [p.a, p.b]).collect();
    Ok(Comparison {
        strategy_a: a.strategy.clone(),
        strategy_b: b.strategy.clone(),
        scale: a.scale(),
        range: value_range(&all),
        pairs,
        summary_a: a.summary(),
        summary_b: b.summary(),
    })
}
