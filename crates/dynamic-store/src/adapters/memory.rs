//! In-process dynamic store.
//! Backs tests and the `memory` backend; optionally seeded from a JSON fixture.

use crate::config::ConfigError;
use crate::encoding::StringEncoding;
use crate::keys;
use crate::specific::{Gid, Uid};
use crate::value::{Dictionary, Value};
use crate::{DynamicStore, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping store keys to values
    pub fn from_fixture(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let values: BTreeMap<String, Value> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Seeded memory store with {} keys from {}", values.len(), path.display());
        Ok(Self {
            values: RwLock::new(values),
        })
    }

    pub fn set_value(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.write().insert(key.into(), value.into());
    }

    pub fn remove_value(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    pub fn set_computer_name(&self, name: &str, encoding: StringEncoding) {
        let mut dict = Dictionary::new();
        dict.insert(keys::PROP_COMPUTER_NAME.into(), Value::from(name));
        dict.insert(
            keys::PROP_COMPUTER_NAME_ENCODING.into(),
            Value::from(encoding.raw()),
        );
        self.set_value(keys::computer_name(), dict);
    }

    pub fn set_console_user(&self, name: &str, uid: Uid, gid: Gid) {
        let mut dict = Dictionary::new();
        dict.insert(keys::PROP_CONSOLE_USER_NAME.into(), Value::from(name));
        dict.insert(keys::PROP_CONSOLE_USER_UID.into(), Value::from(uid));
        dict.insert(keys::PROP_CONSOLE_USER_GID.into(), Value::from(gid));
        self.set_value(keys::console_user(), dict);
    }

    /// Remove the console user entry, as happens on logout
    pub fn clear_console_user(&self) {
        self.remove_value(&keys::console_user());
    }

    pub fn set_local_host_name(&self, name: &str) {
        let mut dict = Dictionary::new();
        dict.insert(keys::PROP_LOCAL_HOST_NAME.into(), Value::from(name));
        self.set_value(keys::host_names(), dict);
    }

    pub fn set_location(&self, current_set: &str) {
        let mut dict = Dictionary::new();
        dict.insert(keys::PROP_CURRENT_SET.into(), Value::from(current_set));
        self.set_value(keys::location(), dict);
    }

    pub fn set_proxies(&self, proxies: Dictionary) {
        self.set_value(keys::proxies(), proxies);
    }

    // Map updates are single inserts or removes, so a poisoned map is still whole
    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Value>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Value>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DynamicStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn copy_value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read().get(key).cloned())
    }
}
