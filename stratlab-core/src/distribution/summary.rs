//! Summary statistics and histogram binning for a distribution.

use super::{GainDistribution, GainScale};
use serde::{Deserialize, Serialize};

/// Default bin count, matching the dashboard histograms.
pub const DEFAULT_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (0.0 for a single value).
    pub std_dev: f64,
    /// Share of windows strictly above break-even.
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub windows: usize,
    pub failed: usize,
    pub scale: GainScale,
    /// `None` when no window produced a gain.
    pub stats: Option<GainStats>,
}

impl DistributionSummary {
    pub fn from_distribution(dist: &GainDistribution) -> Self {
        let scale = dist.scale();
        Self {
            windows: dist.len(),
            failed: dist.failed_count(),
            scale,
            stats: GainStats::from_values(&dist.gains(), scale.break_even()),
        }
    }
}

impl GainStats {
    pub fn from_values(values: &[f64], break_even: f64) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = values.iter().sum::<f64>() / n;
        let median = if sorted.len() % 2 == 1 {
            sorted[sorted.len() / 2]
        } else {
            let hi = sorted.len() / 2;
            (sorted[hi - 1] + sorted[hi]) / 2.0
        };
        let std_dev = if values.len() > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        let wins = values.iter().filter(|&&v| v > break_even).count();

        Some(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median,
            std_dev,
            win_rate: wins as f64 / n,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// How many of `count` lie strictly above break-even.
    pub above_break_even: usize,
    /// `count` as a percentage of all binned values.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Values outside `range` are not binned.
    pub excluded: usize,
}

impl Histogram {
    /// Equal-width bins over `range` (inclusive of both ends).
    ///
    /// A degenerate range is widened by half a unit on each side so a
    /// constant distribution still lands in a bin.
    pub fn from_values(values: &[f64], bins: usize, range: (f64, f64), break_even: f64) -> Self {
        if bins == 0 {
            return Self {
                bins: Vec::new(),
                excluded: values.len(),
            };
        }
        let (mut lo, mut hi) = range;
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: lo + width * i as f64,
                upper: lo + width * (i + 1) as f64,
                count: 0,
                above_break_even: 0,
                percent: 0.0,
            })
            .collect();

        let mut excluded = 0;
        for &v in values {
            if !(lo..=hi).contains(&v) {
                excluded += 1;
                continue;
            }
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            out[idx].count += 1;
            if v > break_even {
                out[idx].above_break_even += 1;
            }
        }

        let binned = values.len() - excluded;
        if binned > 0 {
            for bin in &mut out {
                bin.percent = bin.count as f64 * 100.0 / binned as f64;
            }
        }
        Self {
            bins: out,
            excluded,
        }
    }

    /// Histogram of a distribution over its own value range.
    pub fn of(dist: &GainDistribution, bins: usize) -> Self {
        let gains = dist.gains();
        let range = value_range(&gains).unwrap_or((0.0, 0.0));
        Self::from_values(&gains, bins, range, dist.scale().break_even())
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// `(min, max)` of the values, `None` when empty.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
