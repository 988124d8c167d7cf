//! Display-name registry for strategies.
//!
//! The registry is configuration owned by whoever presents the strategies
//! (CLI, dashboard). The engine itself only ever sees a `GainStrategy`.

use super::{DcaFormula, GainStrategy, StrategyKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown strategy '{name}'. Valid: {available}")]
    UnknownStrategy { name: String, available: String },

    #[error("strategy '{0}' is registered twice")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub name: String,
    pub kind: StrategyKind,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

fn default_color() -> String {
    "black".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRegistry {
    entries: Vec<StrategyEntry>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let entry = |name: &str, kind, color: &str, description: &str| StrategyEntry {
            name: name.into(),
            kind,
            color: color.into(),
            description: description.into(),
        };
        Self {
            entries: vec![
                entry(
                    "Lump sum",
                    StrategyKind::LumpSum,
                    "red",
                    "Invest the whole amount at the start of the period",
                ),
                entry(
                    "DCA",
                    StrategyKind::DollarCostAverage,
                    "blue",
                    "Invest the same amount of money every month",
                ),
                entry(
                    "Equal stock",
                    StrategyKind::EqualStock,
                    "green",
                    "Buy the same number of shares every month",
                ),
                entry(
                    "VCA",
                    StrategyKind::VolatilityCostAverage,
                    "purple",
                    "Buy on falling prices, double up after a skipped rise",
                ),
            ],
        }
    }
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<StrategyEntry>) -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        for entry in entries {
            registry.insert(entry)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, entry: StrategyEntry) -> Result<(), RegistryError> {
        if self.find(&entry.name).is_some() {
            return Err(RegistryError::Duplicate(entry.name));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Case-insensitive lookup by display name, falling back to the kind's
    /// config name (`lump_sum`, `dca`, ...).
    pub fn get(&self, name: &str) -> Result<&StrategyEntry, RegistryError> {
        if let Some(entry) = self.find(name) {
            return Ok(entry);
        }
        if let Ok(kind) = name.parse::<StrategyKind>() {
            if let Some(entry) = self.entries.iter().find(|e| e.kind == kind) {
                return Ok(entry);
            }
        }
        Err(RegistryError::UnknownStrategy {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    pub fn build(
        &self,
        name: &str,
        dca_formula: DcaFormula,
    ) -> Result<Box<dyn GainStrategy>, RegistryError> {
        Ok(self.get(name)?.kind.build(dca_formula))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn entries(&self) -> &[StrategyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Option<&StrategyEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}
