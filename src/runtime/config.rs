//! User-facing runtime configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::events::listener::DEFAULT_SUPPRESSION_WINDOW;

/// Tunables for the tracking core.
///
/// The suppression window is a heuristic tuned against one game's
/// component layout; hosts with slower-cutting objects should widen it
/// rather than rely on the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrassCoreConfig {
    /// Same-object duplicate suppression window, in simulated seconds
    pub suppression_window: f32,
}

impl Default for GrassCoreConfig {
    fn default() -> Self {
        Self {
            suppression_window: DEFAULT_SUPPRESSION_WINDOW,
        }
    }
}

impl GrassCoreConfig {
    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::CorruptData(format!("config serialization: {e}")))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::CorruptData(format!("config file: {e}")))
    }
}
