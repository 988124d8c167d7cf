//! Volatility-cost averaging (VCA).
//!
//! A left-to-right scan over the window:
//! - the first period buys two units
//! - a period priced strictly below the last purchase buys one unit
//! - any other period buys nothing and arms the trigger
//! - an armed trigger buys two units at the next period, whatever its price
//!
//! Gain is final value of all units over total money spent.

use super::{validate, GainStrategy, StrategyError};

#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityCostAverage;

/// Running state of the scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VcaState {
    pub last_purchase_price: Option<f64>,
    pub armed: bool,
    /// One entry per unit bought, holding the price paid.
    pub purchases: Vec<f64>,
}

impl VcaState {
    fn step(mut self, price: f64) -> Self {
        match (self.last_purchase_price, self.armed) {
            (None, _) => self.buy(price, 2),
            (Some(_), true) => {
                self.armed = false;
                self.buy(price, 2)
            }
            (Some(last), false) if price < last => self.buy(price, 1),
            (Some(_), false) => {
                self.armed = true;
                self
            }
        }
    }

    fn buy(mut self, price: f64, units: usize) -> Self {
        self.purchases.extend(std::iter::repeat(price).take(units));
        self.last_purchase_price = Some(price);
        self
    }
}

/// Run the scan and return the final state.
pub fn scan(prices: &[f64]) -> VcaState {
    prices.iter().fold(VcaState::default(), |state, &p| state.step(p))
}

impl GainStrategy for VolatilityCostAverage {
    fn gain(&self, prices: &[f64]) -> Result<f64, StrategyError> {
        validate(prices)?;
        let state = scan(prices);
        let spent: f64 = state.purchases.iter().sum();
        let units = state.purchases.len() as f64;
        Ok(prices[prices.len() - 1] * units / spent)
    }

    fn name(&self) -> &str {
        "volatility_cost_average"
    }
}
