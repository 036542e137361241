//! Path management for glimpse configuration files.
//!
//! ```text
//! ~/.config/glimpse/           # Config directory (platform default)
//! ├── config.toml              # Session and logging configuration
//! └── fixtures/                # Optional seed data for the in-memory store
//! ```

use glimpse_core::error::{GlimpseError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "glimpse";
const CONFIG_FILE: &str = "config.toml";

pub struct GlimpsePaths;

impl GlimpsePaths {
    /// Returns the glimpse configuration directory.
    ///
    /// # Errors
    ///
    /// Fails when the platform config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| GlimpseError::config("Cannot find config directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Returns the directory holding seed fixtures.
    pub fn fixtures_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("fixtures"))
    }
}
