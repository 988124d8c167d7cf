//! Lump sum: everything invested at the window's first price.

use super::{validate, GainStrategy, StrategyError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LumpSum;

impl GainStrategy for LumpSum {
    fn gain(&self, prices: &[f64]) -> Result<f64, StrategyError> {
        validate(prices)?;
        Ok(prices[prices.len() - 1] / prices[0])
    }

    fn name(&self) -> &str {
        "lump_sum"
    }
}
