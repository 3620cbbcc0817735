//! Centralized application directory paths for recap.
//!
//! Provides a single source of truth for the filesystem paths used by the
//! studio client. Uses the [`dirs`] crate for platform-appropriate directory
//! resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Config | `~/Library/Application Support/recap/` | `~/.config/recap/` |
//! | App data | `~/Library/Application Support/recap/` | `~/.local/share/recap/` |
//!
//! # Environment Overrides
//!
//! All paths can be overridden for testing or custom deployments:
//! - `RECAP_CONFIG_DIR` — overrides [`config_dir`]
//! - `RECAP_DATA_DIR` — overrides [`data_dir`]

use std::path::PathBuf;

/// Application config directory.
///
/// Used for `config.toml` and the persisted theme preference.
///
/// Resolves to `dirs::config_dir()/recap/` by default. Override with
/// the `RECAP_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("RECAP_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("recap"))
        .unwrap_or_else(|| PathBuf::from("/tmp/recap-config"))
}

/// Application data root directory.
///
/// Used for logs and any future persistent studio data.
///
/// Resolves to `dirs::data_dir()/recap/` by default. Override with
/// the `RECAP_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("RECAP_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("recap"))
        .unwrap_or_else(|| PathBuf::from("/tmp/recap-data"))
}

/// Default config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted theme preference path (`config_dir()/theme`).
///
/// The file holds exactly one of the literal strings `light` or `dark`.
#[must_use]
pub fn theme_file() -> PathBuf {
    config_dir().join("theme")
}
