//! Application configuration and filesystem context
//!
//! Configuration is a small JSON file under the platform config directory
//! (`~/.config/webq/config.json` on Linux) holding invocation defaults and
//! extra template lines. A missing file yields defaults, which are written
//! back once so the user has something to edit. [`AppContext`] resolves the
//! config and cache paths once at startup; components receive them
//! explicitly instead of consulting globals.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default freshness window: two weeks
pub const DEFAULT_MAX_AGE_MINUTES: u64 = 14 * 24 * 60;

fn default_user_agent() -> String {
    concat!("webq/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_age() -> u64 {
    DEFAULT_MAX_AGE_MINUTES
}

/// Errors produced while loading or saving the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),

    /// The file exists but is not valid config JSON
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisted invocation defaults
///
/// Missing fields fall back to their defaults, so config files from older
/// versions keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// User-agent sent with downloads; empty means the transport default
    pub user_agent: String,
    /// Default freshness window for cache reads, in minutes
    pub max_age_minutes: u64,
    /// Extra template lines, loaded after the builtins
    pub templates: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_age_minutes: default_max_age(),
            templates: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the config file, falling back to defaults when it is missing.
    ///
    /// On first run the defaults are written back so the user has a file to
    /// edit; a failed write is only a warning.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        if let Err(err) = config.save(path) {
            warn!("unable to write default config to {}: {err}", path.display());
        }
        Ok(config)
    }

    /// Saves the config as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        Ok(fs::write(path, json)?)
    }
}

/// Resolved filesystem locations for one process
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Where the config file lives
    pub config_path: PathBuf,
    /// Root directory of the response cache
    pub cache_dir: PathBuf,
}

impl AppContext {
    /// Resolves the platform config and cache locations
    ///
    /// `~/.config/webq/config.json` and `~/.cache/webq/` on Linux, or the
    /// equivalent paths elsewhere. Returns `None` if no home directory can
    /// be determined.
    pub fn discover() -> Option<Self> {
        let dirs = ProjectDirs::from("", "", "webq")?;
        Some(Self {
            config_path: dirs.config_dir().join("config.json"),
            cache_dir: dirs.cache_dir().to_path_buf(),
        })
    }
}
