//! Configuration file support for ktransw.
//!
//! ktransw reads two configuration files:
//! - Global: `<config dir>/ktransw/config.toml` - User-wide defaults
//! - Project: `./ktransw.toml` - Overrides for the current directory
//!
//! Project config takes precedence over global config, and command-line
//! options take precedence over both.
//!
//! ```toml
//! [tools]
//! ktrans = "C:/Program Files/Fanuc/WinOLPC/bin/ktrans.exe"
//! gpp = "gpp"
//!
//! [headers]
//! release = "V8.30"
//! system = ["kliotyps.kl", "klevkeys.kl"]
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deps::SystemHeaders;

/// Name of the project-local configuration file.
pub const PROJECT_CONFIG_NAME: &str = "ktransw.toml";

/// Error reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// ktransw configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool locations
    pub tools: ToolsConfig,

    /// System header classification
    pub headers: HeadersConfig,
}

/// Locations of the external tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Path to the Karel translator
    pub ktrans: Option<PathBuf>,

    /// Path to the gpp macro preprocessor
    pub gpp: Option<PathBuf>,
}

/// Replacement system header list for a different translator release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    /// Release the list belongs to (informational)
    pub release: Option<String>,

    /// Header names treated as system headers. Replaces the built-in list
    /// when set.
    pub system: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, falling back to defaults if the file doesn't
    /// exist. A file that exists but cannot be parsed is still an error.
    pub fn load_if_exists(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.tools.ktrans.is_some() {
            self.tools.ktrans = other.tools.ktrans;
        }
        if other.tools.gpp.is_some() {
            self.tools.gpp = other.tools.gpp;
        }
        if other.headers.release.is_some() {
            self.headers.release = other.headers.release;
        }
        if other.headers.system.is_some() {
            self.headers.system = other.headers.system;
        }
    }

    /// The system header list to classify against.
    pub fn system_headers(&self) -> SystemHeaders {
        match self.headers.system {
            Some(ref names) => SystemHeaders::new(
                self.headers.release.as_deref().unwrap_or("custom"),
                names.iter().cloned(),
            ),
            None => SystemHeaders::default(),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (./ktransw.toml)
/// 2. Global config (<config dir>/ktransw/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_if_exists(global_path)?);
    }

    config.merge(Config::load_if_exists(project_path)?);

    Ok(config)
}

/// Get the global config path (e.g. `~/.config/ktransw/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ktransw").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get the project config path for a directory.
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_NAME)
}
