//! Platform configuration queries against the system dynamic store
//! Provides computer name, console user, local host name, location and proxy lookups

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub mod adapters;
pub mod config;
pub mod encoding;
pub mod keys;
pub mod nonblocking;
pub mod proxies;
pub mod specific;
pub mod value;

pub use adapters::MemoryStore;
pub use config::{BackendKind, ConfigError, StoreConfig};
pub use encoding::StringEncoding;
pub use proxies::{ProxyEndpoint, ProxyProtocol, ProxySettings};
pub use specific::{
    copy_computer_name, copy_console_user, copy_local_host_name, copy_location, copy_proxies,
    ComputerName, ConsoleUser, Gid, Uid,
};
pub use value::{Dictionary, Value};

/// Dynamic store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error ({code}): {message}")]
    Backend { code: i32, message: String },

    #[error("Malformed value for {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Unsupported platform")]
    UnsupportedPlatform,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Backing store trait - implemented by the platform and in-memory backends
pub trait DynamicStore: Send + Sync {
    /// Short backend name for diagnostics
    fn name(&self) -> &str;

    /// Copy the value stored under `key`.
    ///
    /// `Ok(None)` means the key is not present. The returned value is owned
    /// by the caller and shares nothing with the store.
    fn copy_value(&self, key: &str) -> Result<Option<Value>>;
}

/// Handle to a configuration store. Clones share the same backend.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn DynamicStore>,
}

impl Session {
    pub fn new<S: DynamicStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_store(store: Arc<dyn DynamicStore>) -> Self {
        Self { store }
    }

    /// Open a session on the backend selected by `config`
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let store = create_store(config)?;
        info!("Opened {} session \"{}\"", store.name(), config.session_name);
        Ok(Self { store })
    }

    /// Open a short-lived session using the ambient configuration.
    /// Callers drop it as soon as their single query returns.
    pub fn temporary() -> Result<Self> {
        let config = StoreConfig::load()?;
        let store = create_store(&config)?;
        debug!("Opened temporary {} session", store.name());
        Ok(Self { store })
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub fn copy_value(&self, key: &str) -> Result<Option<Value>> {
        self.store.copy_value(key)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store.name())
            .finish()
    }
}

/// Factory function to create the backend selected by the configuration
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn DynamicStore>> {
    match config.backend {
        BackendKind::Memory => {
            let store = match &config.fixture {
                Some(path) => MemoryStore::from_fixture(path)?,
                None => MemoryStore::new(),
            };
            Ok(Arc::new(store))
        }
        BackendKind::Posix => posix_store(config),
        BackendKind::System => system_store(config),
        BackendKind::Auto => {
            if cfg!(target_os = "macos") {
                system_store(config)
            } else {
                posix_store(config)
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn system_store(config: &StoreConfig) -> Result<Arc<dyn DynamicStore>> {
    Ok(Arc::new(adapters::macos::SystemStore::new(&config.session_name)?))
}

#[cfg(not(target_os = "macos"))]
fn system_store(_config: &StoreConfig) -> Result<Arc<dyn DynamicStore>> {
    Err(StoreError::UnsupportedPlatform)
}

#[cfg(unix)]
fn posix_store(config: &StoreConfig) -> Result<Arc<dyn DynamicStore>> {
    Ok(Arc::new(adapters::posix::PosixStore::new(&config.sysroot)))
}

#[cfg(not(unix))]
fn posix_store(_config: &StoreConfig) -> Result<Arc<dyn DynamicStore>> {
    Err(StoreError::UnsupportedPlatform)
}
