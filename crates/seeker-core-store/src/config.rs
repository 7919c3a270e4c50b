//! Application configuration (`config.json`).
//!
//! The file lives in the per-user configuration directory:
//! - Windows: `%APPDATA%\seekernotes\config.json`
//! - Elsewhere: `$XDG_CONFIG_HOME/seekernotes/config.json`, falling back to the platform
//!   config directory reported by `dirs`

use crate::error::StoreError;
use crate::notes::NotesDir;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "seekernotes";
/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Base config directory for SeekerNotes, if the platform has one.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .map(|appdata| appdata.join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .map(|config| config.join(APP_DIR))
    }
}

/// User configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the user's `.snt` notes. Empty until the user picks one.
    #[serde(default)]
    pub user_selected_directory: String,
    /// UI theme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Config {
    /// Returns `true` if the selected directory is set, is not `/`, and is an existing
    /// directory.
    pub fn is_user_dir_valid(&self) -> bool {
        let dir = self.user_selected_directory.as_str();
        if dir.is_empty() || dir == "/" {
            return false;
        }
        Path::new(dir).is_dir()
    }

    /// The selected notes directory.
    pub fn notes_dir(&self) -> Result<NotesDir, StoreError> {
        NotesDir::open(&self.user_selected_directory)
    }
}

/// Reads and writes `config.json` inside one directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform config directory.
    pub fn default_location() -> Result<Self, StoreError> {
        config_dir().map(Self::new).ok_or(StoreError::NoConfigDir)
    }

    /// Directory holding `config.json`.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of `config.json`.
    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Create the config directory if missing.
    pub fn ensure_dir(&self) -> Result<&Path, StoreError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(StoreError::InvalidDirectory(self.dir.clone()));
        }
        fs::create_dir_all(&self.dir)?;
        Ok(&self.dir)
    }

    /// Load the configuration, writing a default one first if none exists.
    pub fn load(&self) -> Result<Config, StoreError> {
        self.ensure_dir()?;
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "creating default config");
            let config = Config::default();
            self.save(&config)?;
            return Ok(config);
        }

        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Overwrite `config.json` with `config`.
    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let data = serde_json::to_string_pretty(config)?;
        fs::write(self.path(), data)?;
        Ok(())
    }
}
