//! Chordbook configuration with environment variable and file-based loading.
//!
//! Environment variables:
//! - `CHORDBOOK_CATALOG`: Path of the SQLite catalog
//! - `CHORDBOOK_LOG`: Default log filter when `RUST_LOG` is unset
//!
//! Default catalog: `<data dir>/chordbook/library.db`

use crate::error::{ChordbookError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CATALOG_ENV: &str = "CHORDBOOK_CATALOG";
pub const LOG_ENV: &str = "CHORDBOOK_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite catalog file. Parent directories are created on open.
    pub catalog_path: PathBuf,

    /// `tracing` filter directive, e.g. `info` or `chordbook=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            log_level: "info".to_string(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_dir().join("chordbook").join("library.db"))
        .unwrap_or_else(|| PathBuf::from("chordbook/library.db"))
}

impl Config {
    /// Configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Configuration from any variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            catalog_path: lookup(CATALOG_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            log_level: lookup(LOG_ENV).unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration from a YAML file. Missing keys take their defaults.
    ///
    /// ```yaml
    /// catalog_path: /srv/songs/library.db
    /// log_level: debug
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ChordbookError::io(path, e))?;
        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| ChordbookError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit file wins over the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    pub fn with_catalog_path(path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: path.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ChordbookError::Config("catalog_path is empty".to_string()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ChordbookError::Config("log_level is empty".to_string()));
        }
        Ok(())
    }
}
