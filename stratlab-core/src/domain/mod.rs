//! Domain types: intervals, price series, stocks.

pub mod interval;
pub mod series;

pub use interval::{Interval, IntervalError};
pub use series::{PriceSeries, SeriesError, Stock};
