//! Price providers: where monthly price histories come from.

pub mod csv_import;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use provider::{DataError, PriceField, PriceProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
