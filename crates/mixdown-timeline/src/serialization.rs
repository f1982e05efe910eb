//! Arrangement serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible
//! persistence. The decoded waveform caches are skipped: they are derived
//! state, rebuilt by the engine on demand.

use mixdown_core::{MixdownError, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned arrangement file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArrangementFile {
    /// Schema version for migration.
    pub version: u32,
    /// The arrangement data.
    pub arrangement: Arrangement,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ArrangementFile {
    /// Create a new arrangement file from an arrangement.
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            version: CURRENT_VERSION,
            arrangement,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            MixdownError::Serialization(format!("Failed to serialize arrangement: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| MixdownError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(MixdownError::Serialization(format!(
                "Arrangement file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| MixdownError::Serialization(format!("Failed to parse arrangement: {}", e)))
    }

    /// Save the arrangement to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load an arrangement from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to [`CURRENT_VERSION`].
fn migrate(data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    // Version 0 files predate the wrapper; nothing to rewrite yet.
    while version < CURRENT_VERSION {
        version += 1;
    }

    Ok(data)
}
