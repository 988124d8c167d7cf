//! Equal stock: the same number of shares bought every period.
//!
//! Buying one share per period for `n` periods costs `sum(p)` and ends with
//! `n` shares worth `p[n-1]` each.

use super::{validate, GainStrategy, StrategyError};

#[derive(Debug, Clone, Copy, Default)]
pub struct EqualStock;

pub(crate) fn equal_stock_gain(prices: &[f64]) -> f64 {
    let n = prices.len() as f64;
    let spent: f64 = prices.iter().sum();
    n * prices[prices.len() - 1] / spent
}

impl GainStrategy for EqualStock {
    fn gain(&self, prices: &[f64]) -> Result<f64, StrategyError> {
        validate(prices)?;
        Ok(equal_stock_gain(prices))
    }

    fn name(&self) -> &str {
        "equal_stock"
    }
}
