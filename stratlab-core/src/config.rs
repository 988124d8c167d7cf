//! Engine and application configuration, loaded from TOML.

use crate::data::PriceField;
use crate::strategy::{DcaFormula, RegistryError, StrategyEntry, StrategyRegistry};
use crate::window::{WindowBoundary, DEFAULT_STEP_MONTHS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Knobs of the distribution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_boundary: WindowBoundary,
    pub dca_formula: DcaFormula,
    /// Months between consecutive window begins.
    pub step_months: u32,
    /// Months between purchases inside a window.
    pub buy_period_months: u32,
    /// How far back the session asks the provider for history.
    pub history_start: NaiveDate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_boundary: WindowBoundary::Inclusive,
            dca_formula: DcaFormula::Harmonic,
            step_months: DEFAULT_STEP_MONTHS,
            buy_period_months: 1,
            history_start: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_months == 0 {
            return Err(ConfigError::Invalid("engine.step_months must be >= 1".into()));
        }
        if self.buy_period_months == 0 {
            return Err(ConfigError::Invalid(
                "engine.buy_period_months must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Which price provider the application talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yahoo" => Ok(ProviderKind::Yahoo),
            "csv" => Ok(ProviderKind::Csv),
            "synthetic" => Ok(ProviderKind::Synthetic),
            other => Err(format!("unknown provider '{other}'. Valid: yahoo, csv, synthetic")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub provider: ProviderKind,
    /// Directory of `<TICKER>.csv` files for the CSV provider.
    pub csv_dir: PathBuf,
    pub price_field: PriceField,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            csv_dir: PathBuf::from("data"),
            price_field: PriceField::Close,
        }
    }
}

/// Top-level application config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub data: DataConfig,
    /// Replaces the built-in strategy list when non-empty.
    pub strategies: Vec<StrategyEntry>,
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.engine.validate()?;
        // surface duplicate names at load time
        config.registry()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn registry(&self) -> Result<StrategyRegistry, RegistryError> {
        if self.strategies.is_empty() {
            Ok(StrategyRegistry::default())
        } else {
            StrategyRegistry::from_entries(self.strategies.clone())
        }
    }
}
