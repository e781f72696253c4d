//! Queries for specific configuration: computer name, console user,
//! local host name, location and proxies.
//!
//! Each query comes in two forms. Methods on [`Session`] return
//! `Result<Option<T>>` and keep "not set" apart from failures. The free
//! `copy_*` functions take an optional session, open a temporary one when
//! none is given, and report any failure as absence.

use crate::encoding::StringEncoding;
use crate::keys;
use crate::proxies::ProxySettings;
use crate::value::{Dictionary, Value};
use crate::{Result, Session, StoreError};
use serde::Serialize;
use tracing::{debug, warn};

pub type Uid = u32;
pub type Gid = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputerName {
    pub name: String,
    pub encoding: StringEncoding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleUser {
    pub name: String,
    pub uid: Uid,
    pub gid: Gid,
}

impl Session {
    pub fn computer_name(&self) -> Result<Option<ComputerName>> {
        let key = keys::computer_name();
        let Some(dict) = self.copy_dictionary(&key)? else {
            return Ok(None);
        };
        let Some(name) = string_property(&dict, keys::PROP_COMPUTER_NAME) else {
            return Ok(None);
        };
        let encoding = match dict.get(keys::PROP_COMPUTER_NAME_ENCODING) {
            None => StringEncoding::default(),
            Some(value) => value
                .as_i64()
                .and_then(|raw| u32::try_from(raw).ok())
                .map(StringEncoding)
                .unwrap_or_else(|| {
                    debug!("Ignoring {} ComputerNameEncoding under {}", value.kind(), key);
                    StringEncoding::default()
                }),
        };
        Ok(Some(ComputerName { name, encoding }))
    }

    pub fn console_user(&self) -> Result<Option<ConsoleUser>> {
        let key = keys::console_user();
        let Some(dict) = self.copy_dictionary(&key)? else {
            return Ok(None);
        };
        let Some(name) = string_property(&dict, keys::PROP_CONSOLE_USER_NAME) else {
            return Ok(None);
        };
        let uid = id_property(&dict, keys::PROP_CONSOLE_USER_UID)
            .ok_or_else(|| malformed(&key, "missing or invalid UID"))?;
        let gid = id_property(&dict, keys::PROP_CONSOLE_USER_GID)
            .ok_or_else(|| malformed(&key, "missing or invalid GID"))?;
        Ok(Some(ConsoleUser { name, uid, gid }))
    }

    pub fn local_host_name(&self) -> Result<Option<String>> {
        let Some(dict) = self.copy_dictionary(&keys::host_names())? else {
            return Ok(None);
        };
        Ok(string_property(&dict, keys::PROP_LOCAL_HOST_NAME))
    }

    /// Identifier of the active network location (set), as stored
    pub fn location(&self) -> Result<Option<String>> {
        let Some(dict) = self.copy_dictionary(&keys::location())? else {
            return Ok(None);
        };
        Ok(string_property(&dict, keys::PROP_CURRENT_SET))
    }

    pub fn proxies(&self) -> Result<Option<ProxySettings>> {
        Ok(self
            .copy_dictionary(&keys::proxies())?
            .map(ProxySettings::new))
    }

    /// Dictionary stored under `key`. A value of any other type is treated
    /// like a missing key.
    fn copy_dictionary(&self, key: &str) -> Result<Option<Dictionary>> {
        match self.copy_value(key)? {
            None => Ok(None),
            Some(Value::Dictionary(dict)) => Ok(Some(dict)),
            Some(other) => {
                debug!("Ignoring {} value stored under {}", other.kind(), key);
                Ok(None)
            }
        }
    }
}

fn string_property(dict: &Dictionary, property: &str) -> Option<String> {
    dict.get(property)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn id_property(dict: &Dictionary, property: &str) -> Option<u32> {
    dict.get(property)
        .and_then(Value::as_i64)
        .and_then(|id| u32::try_from(id).ok())
}

fn malformed(key: &str, reason: &str) -> StoreError {
    StoreError::Malformed {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Run `query` on the supplied session, or on a temporary one dropped before
/// returning. Errors are logged and reported as absence.
fn with_session<T>(
    session: Option<&Session>,
    operation: &str,
    query: impl FnOnce(&Session) -> Result<Option<T>>,
) -> Option<T> {
    let result = match session {
        Some(session) => query(session),
        None => Session::temporary().and_then(|temporary| query(&temporary)),
    };

    match result {
        Ok(value) => {
            debug!("{} -> {}", operation, if value.is_some() { "value" } else { "absent" });
            value
        }
        Err(e) => {
            warn!("{} failed: {}", operation, e);
            None
        }
    }
}

/// Current computer name.
///
/// `name_encoding`, when supplied, receives the name's encoding. It is left
/// untouched when the name is absent.
pub fn copy_computer_name(
    session: Option<&Session>,
    name_encoding: Option<&mut StringEncoding>,
) -> Option<String> {
    let computer = with_session(session, "copy_computer_name", Session::computer_name)?;
    if let Some(slot) = name_encoding {
        *slot = computer.encoding;
    }
    Some(computer.name)
}

/// Name of the user logged into the console.
///
/// `uid` and `gid`, when supplied, are filled only when a user is logged in.
pub fn copy_console_user(
    session: Option<&Session>,
    uid: Option<&mut Uid>,
    gid: Option<&mut Gid>,
) -> Option<String> {
    let user = with_session(session, "copy_console_user", Session::console_user)?;
    if let Some(slot) = uid {
        *slot = user.uid;
    }
    if let Some(slot) = gid {
        *slot = user.gid;
    }
    Some(user.name)
}

pub fn copy_local_host_name(session: Option<&Session>) -> Option<String> {
    with_session(session, "copy_local_host_name", Session::local_host_name)
}

pub fn copy_location(session: Option<&Session>) -> Option<String> {
    with_session(session, "copy_location", Session::location)
}

pub fn copy_proxies(session: Option<&Session>) -> Option<ProxySettings> {
    with_session(session, "copy_proxies", Session::proxies)
}
