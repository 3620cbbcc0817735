//! Configuration types for the recap studio client.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the studio client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Backend API settings.
    pub api: ApiConfig,
    /// Generation parameter defaults.
    pub generation: GenerationConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the summarization backend.
    pub base_url: String,
    /// Overall deadline for a completion request in seconds.
    ///
    /// The source UI never defined a timeout; this bounds a stalled stream.
    /// Expiry surfaces as a `Timeout` completion failure, not a crash.
    pub request_timeout_secs: u64,
    /// TCP connect deadline in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".into(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}

/// Generation parameter defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Starting temperature for the session.
    ///
    /// Bounded to \[0.0, 1.0\]; higher values make output more creative
    /// and less predictable.
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.5 }
    }
}

impl StudioConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::StudioError::Config(e.to_string()))
    }

    /// Load from the default config path, or defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error only for a present-but-invalid file; a missing file
    /// is not an error.
    pub fn load_or_default() -> crate::error::Result<Self> {
        let path = Self::default_config_path();
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::StudioError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir()/config.toml`).
    pub fn default_config_path() -> PathBuf {
        crate::recap_dirs::config_file()
    }
}
