//! Crash-safe TOML storage for the glimpse configuration.

use glimpse_core::config::RootConfig;
use glimpse_core::error::{GlimpseError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Reads and writes `config.toml`.
///
/// Writes go to a sibling temp file which is fsynced and renamed over the
/// target, so readers never see a half-written file. Read-modify-write
/// cycles hold an exclusive lock on `<file>.lock`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config. A missing or blank file yields `None`.
    pub fn load(&self) -> Result<Option<RootConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let config: RootConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Writes `config` atomically after validating it.
    pub fn save(&self, config: &RootConfig) -> Result<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(config)?;
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(rendered.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Loads (or defaults), applies `f`, and saves under the file lock.
    pub fn update<F>(&self, f: F) -> Result<RootConfig>
    where
        F: FnOnce(&mut RootConfig),
    {
        let _lock = LockGuard::acquire(&self.path)?;
        let mut config = self.load()?.unwrap_or_default();
        f(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| GlimpseError::io("Config path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| GlimpseError::io("Config path has no file name"))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive advisory lock, released when the handle closes.
struct LockGuard {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl LockGuard {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| GlimpseError::io(format!("Failed to lock config: {}", e)))?;
        }

        Ok(Self { file, lock_path })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
