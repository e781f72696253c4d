//! Internet proxy settings as published under `State:/Network/Global/Proxies`

use crate::value::{Dictionary, Value};
use serde::Serialize;
use tracing::debug;

pub const EXCEPTIONS_LIST: &str = "ExceptionsList";
pub const EXCLUDE_SIMPLE_HOSTNAMES: &str = "ExcludeSimpleHostnames";
pub const FTP_PASSIVE: &str = "FTPPassive";
pub const AUTO_CONFIG_ENABLE: &str = "ProxyAutoConfigEnable";
pub const AUTO_CONFIG_URL: &str = "ProxyAutoConfigURLString";
pub const AUTO_DISCOVERY_ENABLE: &str = "ProxyAutoDiscoveryEnable";

/// Protocols with a host/port proxy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyProtocol {
    Http,
    Https,
    Ftp,
    Gopher,
    Rtsp,
    Socks,
}

impl ProxyProtocol {
    pub const ALL: [ProxyProtocol; 6] = [
        ProxyProtocol::Http,
        ProxyProtocol::Https,
        ProxyProtocol::Ftp,
        ProxyProtocol::Gopher,
        ProxyProtocol::Rtsp,
        ProxyProtocol::Socks,
    ];

    fn prefix(self) -> &'static str {
        match self {
            ProxyProtocol::Http => "HTTP",
            ProxyProtocol::Https => "HTTPS",
            ProxyProtocol::Ftp => "FTP",
            ProxyProtocol::Gopher => "Gopher",
            ProxyProtocol::Rtsp => "RTSP",
            ProxyProtocol::Socks => "SOCKS",
        }
    }

    /// e.g. `HTTPEnable`
    pub fn enable_key(self) -> String {
        format!("{}Enable", self.prefix())
    }

    /// e.g. `HTTPProxy`
    pub fn host_key(self) -> String {
        format!("{}Proxy", self.prefix())
    }

    /// e.g. `HTTPPort`
    pub fn port_key(self) -> String {
        format!("{}Port", self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: Option<u16>,
}

/// Owned proxy configuration mapping
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ProxySettings {
    entries: Dictionary,
}

impl ProxySettings {
    /// Wrap a raw dictionary, disabling any protocol that is switched on
    /// without a proxy host.
    pub fn new(mut entries: Dictionary) -> Self {
        for protocol in ProxyProtocol::ALL {
            let enabled = entries
                .get(&protocol.enable_key())
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if enabled && host_of(&entries, protocol).is_none() {
                debug!("Disabling {:?} proxy with no host", protocol);
                entries.insert(protocol.enable_key(), Value::Integer(0));
            }
        }
        Self { entries }
    }

    pub fn endpoint(&self, protocol: ProxyProtocol) -> Option<ProxyEndpoint> {
        if !self.flag(&protocol.enable_key()) {
            return None;
        }
        let host = host_of(&self.entries, protocol)?;
        let port = self
            .entries
            .get(&protocol.port_key())
            .and_then(Value::as_i64)
            .and_then(|port| u16::try_from(port).ok());
        Some(ProxyEndpoint {
            host: host.to_string(),
            port,
        })
    }

    /// Hosts and domains that bypass the proxies
    pub fn exceptions(&self) -> Vec<String> {
        self.entries
            .get(EXCEPTIONS_LIST)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn exclude_simple_hostnames(&self) -> bool {
        self.flag(EXCLUDE_SIMPLE_HOSTNAMES)
    }

    pub fn ftp_passive(&self) -> bool {
        self.flag(FTP_PASSIVE)
    }

    /// PAC file location, when automatic configuration is switched on
    pub fn auto_config_url(&self) -> Option<&str> {
        if !self.flag(AUTO_CONFIG_ENABLE) {
            return None;
        }
        self.entries
            .get(AUTO_CONFIG_URL)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn auto_discovery(&self) -> bool {
        self.flag(AUTO_DISCOVERY_ENABLE)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> Dictionary {
        self.entries
    }

    fn flag(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

fn host_of(entries: &Dictionary, protocol: ProxyProtocol) -> Option<&str> {
    entries
        .get(&protocol.host_key())
        .and_then(Value::as_str)
        .filter(|host| !host.is_empty())
}
