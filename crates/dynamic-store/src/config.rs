use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Names a configuration file to load instead of the per-user default
pub const CONFIG_ENV: &str = "DYNAMIC_STORE_CONFIG";
/// Overrides the backend selected by the configuration file
pub const BACKEND_ENV: &str = "DYNAMIC_STORE_BACKEND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),
}

/// Which backend a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The native store for the current platform
    #[default]
    Auto,
    /// SystemConfiguration on macOS
    System,
    /// Host files and proxy environment variables
    Posix,
    /// In-process store, optionally seeded from a fixture
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "system" => Ok(Self::System),
            "posix" => Ok(Self::Posix),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Client name registered with the system store
    pub session_name: String,
    /// Filesystem root the posix backend reads host files from
    pub sysroot: PathBuf,
    /// JSON file mapping store keys to values, for the memory backend
    pub fixture: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Auto,
            session_name: "dynamic-store".to_string(),
            sysroot: PathBuf::from("/"),
            fixture: None,
        }
    }
}

impl StoreConfig {
    /// Resolve the ambient configuration.
    ///
    /// The file named by `DYNAMIC_STORE_CONFIG` wins, then the per-user
    /// `dynamic-store/config.json`, then defaults. `DYNAMIC_STORE_BACKEND`
    /// is applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(backend) = std::env::var(BACKEND_ENV) {
            config.backend = backend.parse()?;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading store configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(custom));
    }

    dirs::config_dir()
        .map(|dir| dir.join("dynamic-store").join("config.json"))
        .filter(|path| path.exists())
}
