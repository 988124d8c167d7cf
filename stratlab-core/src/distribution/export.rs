//! Export of gain distributions as JSON and CSV.
//!
//! JSON carries a `schema_version`; documents from a newer version are
//! rejected on import.

use super::GainDistribution;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(dist: &GainDistribution) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(dist)?)
}

pub fn import_json(json: &str) -> Result<GainDistribution, ExportError> {
    let dist: GainDistribution = serde_json::from_str(json)?;
    if dist.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: dist.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(dist)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: begin, end, gain, error. Exactly one of gain/error is filled.
pub fn export_csv(dist: &GainDistribution) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["begin", "end", "gain", "error"])?;

    for entry in &dist.entries {
        let (gain, error) = match &entry.gain {
            Ok(g) => (format!("{g:.8}"), String::new()),
            Err(e) => (String::new(), e.to_string()),
        };
        wtr.write_record([
            entry.window.begin().to_string(),
            entry.window.end().to_string(),
            gain,
            error,
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `<ticker>_<strategy>_<id>.json` and `.csv` into `dir`.
///
/// Returns the path stem shared by both files.
pub fn save_artifacts(dist: &GainDistribution, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let run_id = dist.run_id();
    let ticker: String = dist
        .ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = dir.join(format!("{ticker}_{}_{}", dist.strategy, &run_id[..12]));

    std::fs::write(stem.with_extension("json"), export_json(dist)?)?;
    std::fs::write(stem.with_extension("csv"), export_csv(dist)?)?;
    Ok(stem)
}
