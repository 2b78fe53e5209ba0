//! Application configuration
//!
//! Everything has a default, so a missing config file is not an error.
//! The file always lives at `<config_dir>/studio-gallery/config.json`;
//! nothing is read from the environment.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{GalleryError, Result};

const APP_DIR: &str = "studio-gallery";

/// Codes shipped with the studio's current bookings
const DEFAULT_CODES: [&str; 3] = ["WEDDING2024", "PORTRAIT2024", "EVENT2024"];

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StudioConfig {
    /// Shared admin secret, compared byte for byte
    pub admin_password: String,
    /// Codes a client may log in with
    pub client_codes: Vec<String>,
    /// Codes the admin overview reads. Kept separate from `client_codes`.
    pub aggregate_codes: Vec<String>,
    /// How long the download spinner stays on after a save is triggered
    pub download_reset_ms: u64,
    /// Override for the directory holding `gallery.db`
    pub data_dir: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            admin_password: "admin123".to_string(),
            client_codes: DEFAULT_CODES.iter().map(|c| c.to_string()).collect(),
            aggregate_codes: DEFAULT_CODES.iter().map(|c| c.to_string()).collect(),
            download_reset_ms: 1000,
            data_dir: None,
        }
    }
}

impl StudioConfig {
    /// Load from the standard config location
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found, using default config", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_str(&json).map_err(|e| GalleryError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(APP_DIR);
        path.push("config.json");
        Some(path)
    }

    /// Where the gallery database lives
    pub fn db_path(&self) -> PathBuf {
        let mut path = self
            .data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .or_else(|| dirs::home_dir().map(|dir| dir.join(format!(".{}", APP_DIR))))
            .unwrap_or_else(|| PathBuf::from(APP_DIR));

        path.push("gallery.db");
        path
    }

    pub fn download_reset(&self) -> Duration {
        Duration::from_millis(self.download_reset_ms)
    }
}
