//! CSV price provider: one `<TICKER>.csv` file per ticker.
//!
//! Files have a header row and two columns, `date` (YYYY-MM-DD) and
//! `price`, sorted ascending by date.

use super::provider::{DataError, PriceProvider};
use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    price: f64,
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    /// Write a series in the format this provider reads.
    pub fn write(&self, ticker: &str, series: &PriceSeries) -> Result<PathBuf, DataError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(ticker);
        let mut wtr = csv::Writer::from_path(&path)?;
        wtr.write_record(["date", "price"])?;
        for (date, price) in series.iter() {
            wtr.write_record([date.to_string(), price.to_string()])?;
        }
        wtr.flush()?;
        Ok(path)
    }
}

fn read_series(path: &Path, since: NaiveDate) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut points = Vec::new();
    for row in rdr.deserialize() {
        let row: PriceRow = row?;
        if row.date >= since {
            points.push((row.date, row.price));
        }
    }
    Ok(PriceSeries::from_points(points)?)
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_monthly_prices(
        &self,
        ticker: &str,
        since: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            });
        }
        read_series(&path, since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn write_then_fetch_since() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        let series =
            PriceSeries::from_points(vec![(d(1999, 12), 9.5), (d(2000, 1), 10.0), (d(2000, 2), 10.5)])
                .unwrap();
        provider.write("ACME", &series).unwrap();

        let fetched = provider.fetch_monthly_prices("ACME", d(2000, 1)).unwrap();
        assert_eq!(fetched.prices(), &[10.0, 10.5]);
    }

    #[test]
    fn missing_file_is_unknown_ticker() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        assert!(matches!(
            provider.fetch_monthly_prices("NOPE", d(1900, 1)),
            Err(DataError::UnknownTicker { .. })
        ));
    }

    #[test]
    fn unsorted_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("BAD.csv"),
            "date,price\n2000-02-01,2.0\n2000-01-01,1.0\n",
        )
        .unwrap();
        let provider = CsvProvider::new(dir.path());
        assert!(matches!(
            provider.fetch_monthly_prices("BAD", d(1900, 1)),
            Err(DataError::Validation(_))
        ));
    }

    #[test]
    fn malformed_price_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("X.csv"), "date,price\n2000-01-01,abc\n").unwrap();
        let provider = CsvProvider::new(dir.path());
        assert!(matches!(
            provider.fetch_monthly_prices("X", d(1900, 1)),
            Err(DataError::Csv(_))
        ));
    }
}
