//! Well-known dynamic store keys and property names

/// Domain for persistent (preference-backed) configuration
pub const DOMAIN_SETUP: &str = "Setup:";
/// Domain for live state published by configuration agents
pub const DOMAIN_STATE: &str = "State:";

pub const PROP_COMPUTER_NAME: &str = "ComputerName";
pub const PROP_COMPUTER_NAME_ENCODING: &str = "ComputerNameEncoding";
pub const PROP_CONSOLE_USER_NAME: &str = "Name";
pub const PROP_CONSOLE_USER_UID: &str = "UID";
pub const PROP_CONSOLE_USER_GID: &str = "GID";
pub const PROP_LOCAL_HOST_NAME: &str = "LocalHostName";
pub const PROP_CURRENT_SET: &str = "CurrentSet";

/// Builds a key in the setup domain, e.g. `setup_key("/System")`.
pub fn setup_key(path: &str) -> String {
    format!("{DOMAIN_SETUP}{path}")
}

/// Builds a key in the state domain.
pub fn state_key(path: &str) -> String {
    format!("{DOMAIN_STATE}{path}")
}

pub fn computer_name() -> String {
    setup_key("/System")
}

pub fn console_user() -> String {
    state_key("/Users/ConsoleUser")
}

pub fn host_names() -> String {
    setup_key("/Network/HostNames")
}

/// The location lives on the setup domain root itself.
pub fn location() -> String {
    DOMAIN_SETUP.to_string()
}

pub fn proxies() -> String {
    state_key("/Network/Global/Proxies")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_keys() {
        assert_eq!(computer_name(), "Setup:/System");
        assert_eq!(console_user(), "State:/Users/ConsoleUser");
        assert_eq!(host_names(), "Setup:/Network/HostNames");
        assert_eq!(location(), "Setup:");
        assert_eq!(proxies(), "State:/Network/Global/Proxies");
    }
}
