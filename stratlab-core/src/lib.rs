//! StratLab Core — windowed simulation of periodic-investing strategies.
//!
//! This crate contains:
//! - Domain types (intervals, monthly price series, stocks)
//! - Sliding-window partitioning and periodic resampling
//! - Investing strategies (lump sum, DCA, equal stock, VCA) behind one trait
//! - The distribution engine and its statistics, comparison and export
//! - Price providers (Yahoo Finance, CSV, synthetic)
//! - The investing session used by front-ends

pub mod config;
pub mod data;
pub mod distribution;
pub mod domain;
pub mod resample;
pub mod session;
pub mod strategy;
pub mod window;

pub use config::{AppConfig, ConfigError, EngineConfig};
pub use distribution::{DistributionOptions, GainDistribution, GainScale, WindowGain};
pub use domain::{Interval, PriceSeries, Stock};
pub use session::{InvestingSession, SessionError};
pub use strategy::{GainStrategy, StrategyKind};
