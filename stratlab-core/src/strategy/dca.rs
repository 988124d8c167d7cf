//! Dollar-cost averaging: the same amount of money invested every period.

use super::equal_stock::equal_stock_gain;
use super::{validate, GainStrategy, StrategyError};
use serde::{Deserialize, Serialize};

/// Which DCA gain formula to use.
///
/// The two are not algebraically equal. `Harmonic` models equal currency
/// amounts per period; `Arithmetic` is the formula earlier dashboard
/// revisions reported as "DCA" and coincides with [`super::EqualStock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DcaFormula {
    /// `p[n-1] * sum(1/p) / n`
    #[default]
    Harmonic,
    /// `n * p[n-1] / sum(p)`
    Arithmetic,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DollarCostAverage {
    pub formula: DcaFormula,
}

impl DollarCostAverage {
    pub fn new(formula: DcaFormula) -> Self {
        Self { formula }
    }
}

impl GainStrategy for DollarCostAverage {
    fn gain(&self, prices: &[f64]) -> Result<f64, StrategyError> {
        validate(prices)?;
        let last = prices[prices.len() - 1];
        let n = prices.len() as f64;
        Ok(match self.formula {
            DcaFormula::Harmonic => {
                // one currency unit per period buys 1/p shares
                let shares: f64 = prices.iter().map(|p| 1.0 / p).sum();
                last * shares / n
            }
            DcaFormula::Arithmetic => equal_stock_gain(prices),
        })
    }

    fn name(&self) -> &str {
        "dollar_cost_average"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn harmonic_buys_more_when_cheap() {
        // 1/1 + 1/2 = 1.5 shares worth 2 each, 2 units spent
        let g = DollarCostAverage::new(DcaFormula::Harmonic)
            .gain(&[1.0, 2.0])
            .unwrap();
        assert!(close(g, 1.5));
    }

    #[test]
    fn arithmetic_matches_equal_stock() {
        let prices = [4.0, 2.0, 5.0];
        let g = DollarCostAverage::new(DcaFormula::Arithmetic)
            .gain(&prices)
            .unwrap();
        assert!(close(g, 3.0 * 5.0 / 11.0));
    }

    #[test]
    fn formulas_differ_on_volatile_prices() {
        let prices = [4.0, 2.0, 5.0];
        let h = DollarCostAverage::new(DcaFormula::Harmonic).gain(&prices).unwrap();
        let a = DollarCostAverage::new(DcaFormula::Arithmetic).gain(&prices).unwrap();
        // harmonic mean <= arithmetic mean, so equal-money DCA gains at least as much
        assert!(h > a);
    }

    #[test]
    fn both_break_even_on_constant_prices() {
        for formula in [DcaFormula::Harmonic, DcaFormula::Arithmetic] {
            let g = DollarCostAverage::new(formula).gain(&[9.0; 24]).unwrap();
            assert!(close(g, 1.0));
        }
    }

    #[test]
    fn scale_invariant() {
        let prices = [3.0, 1.5, 4.0, 2.5];
        let scaled: Vec<f64> = prices.iter().map(|p| p * 0.01).collect();
        let dca = DollarCostAverage::default();
        assert!((dca.gain(&prices).unwrap() - dca.gain(&scaled).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn zero_price_anywhere_fails() {
        let dca = DollarCostAverage::default();
        assert_eq!(
            dca.gain(&[1.0, 2.0, 0.0, 3.0]),
            Err(StrategyError::DivisionByZero { index: 2 })
        );
    }
}
