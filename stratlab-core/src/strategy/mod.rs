//! Investing strategies — map one window's resampled prices to a gain ratio.
//!
//! A gain ratio is final value over money invested: 1.0 is break-even.
//! Strategies are stateless between calls; VCA keeps a running state only
//! inside a single evaluation.

pub mod dca;
pub mod equal_stock;
pub mod lump_sum;
pub mod registry;
pub mod vca;

pub use dca::{DcaFormula, DollarCostAverage};
pub use equal_stock::EqualStock;
pub use lump_sum::LumpSum;
pub use registry::{RegistryError, StrategyEntry, StrategyRegistry};
pub use vca::VolatilityCostAverage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StrategyError {
    #[error("window has no prices")]
    EmptyWindow,

    #[error("division by zero: price at position {index} is zero")]
    DivisionByZero { index: usize },

    #[error("price at position {index} is not finite")]
    NonFinite { index: usize },

    #[error("price at position {index} is negative")]
    NegativePrice { index: usize },
}

/// A periodic-investing strategy.
///
/// # Invariants
/// - `gain()` is a pure function of `prices`
/// - `prices` is one window in chronological order, one entry per purchase period
pub trait GainStrategy: Send + Sync {
    /// Gain ratio for one window.
    fn gain(&self, prices: &[f64]) -> Result<f64, StrategyError>;

    /// Strategy name for logging and exported results
    fn name(&self) -> &str;
}

/// Reject windows a ratio cannot be computed from.
///
/// Every strategy divides by some price, so a zero anywhere in the window is
/// treated as missing data rather than producing an infinite gain. Negative
/// prices have no meaning as a purchase cost.
pub(crate) fn validate(prices: &[f64]) -> Result<(), StrategyError> {
    if prices.is_empty() {
        return Err(StrategyError::EmptyWindow);
    }
    for (index, &p) in prices.iter().enumerate() {
        if !p.is_finite() {
            return Err(StrategyError::NonFinite { index });
        }
        if p == 0.0 {
            return Err(StrategyError::DivisionByZero { index });
        }
        if p < 0.0 {
            return Err(StrategyError::NegativePrice { index });
        }
    }
    Ok(())
}

/// Built-in strategies, selectable by name from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    LumpSum,
    DollarCostAverage,
    EqualStock,
    VolatilityCostAverage,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::LumpSum,
        StrategyKind::DollarCostAverage,
        StrategyKind::EqualStock,
        StrategyKind::VolatilityCostAverage,
    ];

    /// Instantiate the strategy; `dca_formula` only affects DCA.
    pub fn build(self, dca_formula: DcaFormula) -> Box<dyn GainStrategy> {
        match self {
            StrategyKind::LumpSum => Box::new(LumpSum),
            StrategyKind::DollarCostAverage => Box::new(DollarCostAverage::new(dca_formula)),
            StrategyKind::EqualStock => Box::new(EqualStock),
            StrategyKind::VolatilityCostAverage => Box::new(VolatilityCostAverage),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::LumpSum => "lump_sum",
            StrategyKind::DollarCostAverage => "dollar_cost_average",
            StrategyKind::EqualStock => "equal_stock",
            StrategyKind::VolatilityCostAverage => "volatility_cost_average",
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "lump_sum" | "lumpsum" => Ok(StrategyKind::LumpSum),
            "dollar_cost_average" | "dca" => Ok(StrategyKind::DollarCostAverage),
            "equal_stock" => Ok(StrategyKind::EqualStock),
            "volatility_cost_average" | "vca" => Ok(StrategyKind::VolatilityCostAverage),
            other => Err(format!(
                "unknown strategy '{other}'. Valid: lump_sum, dca, equal_stock, vca"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_flags_zero_and_nan() {
        assert_eq!(validate(&[]), Err(StrategyError::EmptyWindow));
        assert_eq!(
            validate(&[1.0, 0.0, 2.0]),
            Err(StrategyError::DivisionByZero { index: 1 })
        );
        assert_eq!(
            validate(&[1.0, f64::NAN]),
            Err(StrategyError::NonFinite { index: 1 })
        );
        assert!(validate(&[1.0, 2.0]).is_ok());
    }

    #[test]
    fn negative_prices_rejected_by_every_kind() {
        let prices = [-1.0, -1.0, -1.0, 2.0, 2.0];
        assert_eq!(
            validate(&prices),
            Err(StrategyError::NegativePrice { index: 0 })
        );
        for kind in StrategyKind::ALL {
            assert_eq!(
                kind.build(DcaFormula::default()).gain(&[1.0, 2.0, -0.5]),
                Err(StrategyError::NegativePrice { index: 2 })
            );
        }
    }

    #[test]
    fn every_kind_builds_and_reports_its_name() {
        for kind in StrategyKind::ALL {
            let strategy = kind.build(DcaFormula::default());
            assert_eq!(strategy.name(), kind.as_str());
            assert!(strategy.gain(&[1.0, 1.0, 1.0]).is_ok());
        }
    }

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("DCA".parse::<StrategyKind>(), Ok(StrategyKind::DollarCostAverage));
        assert_eq!("lump-sum".parse::<StrategyKind>(), Ok(StrategyKind::LumpSum));
        assert!("martingale".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn trait_objects_are_send_sync() {
        fn require_send_sync<T: Send + Sync + ?Sized>() {}
        require_send_sync::<dyn GainStrategy>();
    }
}
