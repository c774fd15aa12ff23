//! Dashboard configuration
//!
//! Stored as JSON, by default in `<config_dir>/shopboard/config.json`.
//! Missing or unreadable files fall back to defaults; CLI flags override
//! individual fields afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default backend address (Flask development server)
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Rows of the RFM table shown before the "use CSV" footnote kicks in
pub const DEFAULT_RFM_PREVIEW_ROWS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Base URL the `/analytics/*` paths are appended to
    pub api_base_url: String,

    /// Per-request timeout. `None` means a hung request keeps its panel in
    /// `Loading` until the connection drops.
    pub request_timeout_secs: Option<u64>,

    /// Maximum RFM rows rendered in the table view
    pub rfm_preview_rows: usize,

    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            rfm_preview_rows: DEFAULT_RFM_PREVIEW_ROWS,
            export_dir: PathBuf::from("."),
        }
    }
}

impl BoardConfig {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shopboard").join("config.json"))
    }

    /// Load config from `path`.
    /// Returns defaults on any I/O or parse error (graceful degradation).
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    debug!(path = %path.display(), "Config loaded");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
        }
    }

    /// Persist config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
