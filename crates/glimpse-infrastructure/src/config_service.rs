//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/glimpse/config.toml` and
//! caches it for the lifetime of the process.

use crate::paths::GlimpsePaths;
use crate::storage::ConfigStore;
use glimpse_core::config::RootConfig;
use glimpse_core::error::Result;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    store: ConfigStore,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service backed by the default config path.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(GlimpsePaths::config_file()?))
    }

    /// Creates a service backed by a custom path (for testing or `--config`).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            store: ConfigStore::new(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults. A file that fails validation is an
    /// error rather than being silently replaced.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let loaded = self.store.load()?.unwrap_or_default();
        loaded.validate()?;

        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Writes the default configuration if no file exists yet.
    ///
    /// Returns `true` when a file was created.
    pub fn init(&self) -> Result<bool> {
        if self.store.load()?.is_some() {
            return Ok(false);
        }
        self.store.save(&RootConfig::default())?;
        self.invalidate_cache();
        Ok(true)
    }

    /// Applies `f` to the stored config and refreshes the cache.
    pub fn update<F>(&self, f: F) -> Result<RootConfig>
    where
        F: FnOnce(&mut RootConfig),
    {
        let updated = self.store.update(f)?;
        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = Some(updated.clone());
        Ok(updated)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = None;
    }
}
