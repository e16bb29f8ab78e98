// Configuration: data/export locations and log level

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::persistence::APP_NAME;

/// Environment variable overriding `data_dir`
pub const DATA_DIR_ENV: &str = "FOCUSFLOW_DATA_DIR";

/// Environment variable overriding `export_dir`
pub const EXPORT_DIR_ENV: &str = "FOCUSFLOW_EXPORT_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted task collection
    pub data_dir: PathBuf,
    /// Directory export files are written to
    pub export_dir: PathBuf,
    /// One of error, warn, info, debug, trace
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            export_dir: PathBuf::from("."),
            log_level: None,
        }
    }
}

impl Config {
    /// Resolve configuration: file, then environment
    ///
    /// With `explicit` the file must exist. Otherwise the per-user config
    /// file is read if present and defaults are used if not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = ?path, "Loaded config file");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(EXPORT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.export_dir = PathBuf::from(dir);
        }
    }
}

/// `<data dir>/focusflow`, or `./.focusflow` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_NAME)))
}

/// `<config dir>/focusflow/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.yaml"))
}
