use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform text-encoding tag attached to the computer name.
///
/// The numeric values are the ones the system configuration store records,
/// so a tag read from the store round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringEncoding(pub u32);

impl StringEncoding {
    pub const MAC_ROMAN: Self = Self(0);
    pub const UTF16: Self = Self(0x0100);
    pub const ISO_LATIN1: Self = Self(0x0201);
    pub const WINDOWS_LATIN1: Self = Self(0x0500);
    pub const ASCII: Self = Self(0x0600);
    pub const UTF8: Self = Self(0x0800_0100);

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::MAC_ROMAN => Some("MacRoman"),
            Self::UTF16 => Some("UTF-16"),
            Self::ISO_LATIN1 => Some("ISO-8859-1"),
            Self::WINDOWS_LATIN1 => Some("Windows-1252"),
            Self::ASCII => Some("ASCII"),
            Self::UTF8 => Some("UTF-8"),
            _ => None,
        }
    }
}

impl Default for StringEncoding {
    fn default() -> Self {
        Self::UTF8
    }
}

impl fmt::Display for StringEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "encoding {:#x}", self.0),
        }
    }
}
