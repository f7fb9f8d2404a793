//! Application configuration: JSON file plus environment overrides.

use std::path::Path;

use cutdeck_core::{CutdeckError, EditorConfig, Result};
use cutdeck_timeline::ExportSettings;
use serde::{Deserialize, Serialize};

/// Path of an optional JSON config file.
pub const CONFIG_ENV: &str = "CUTDECK_CONFIG";
/// Overrides [`AppConfig::backend_url`].
pub const BACKEND_URL_ENV: &str = "CUTDECK_BACKEND_URL";
/// Overrides [`AppConfig::log_level`].
pub const LOG_ENV: &str = "CUTDECK_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the render backend. Empty runs offline against an
    /// in-memory backend.
    pub backend_url: String,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Initial values of the export dialog.
    pub export: ExportSettings,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            log_level: "info".to_string(),
            export: ExportSettings::default(),
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `CUTDECK_CONFIG` (if set) and apply environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_overrides(
            std::env::var(BACKEND_URL_ENV).ok(),
            std::env::var(LOG_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text)
                .map_err(|e| CutdeckError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CutdeckError::Config(e.to_string()))
    }

    pub fn apply_overrides(&mut self, backend_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = backend_url {
            self.backend_url = url.trim().to_string();
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.editor.validate()
    }

    pub fn is_offline(&self) -> bool {
        self.backend_url.is_empty()
    }
}
