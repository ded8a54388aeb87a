//! Host addresses.

use std::fmt;

/// A single host address.
///
/// The derived ordering is the display order: IPv4, then IPv6, then MAC,
/// lexicographic on the string form within a type. The same key drives
/// host identity, so it must stay total and deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Address {
    IPv4(String),
    IPv6(String),
    Mac(String),
}

impl Address {
    /// Build an address from the wire type name and string form.
    ///
    /// Returns `None` for unrecognized type names; the parser warns and
    /// skips those rather than aborting.
    pub fn from_parts(addr_type: &str, addr: impl Into<String>) -> Option<Self> {
        match addr_type {
            "ipv4" => Some(Self::IPv4(addr.into())),
            "ipv6" => Some(Self::IPv6(addr.into())),
            "mac" => Some(Self::Mac(addr.into())),
            _ => None,
        }
    }

    /// The wire name of this address type.
    pub fn addr_type(&self) -> &'static str {
        match self {
            Self::IPv4(_) => "ipv4",
            Self::IPv6(_) => "ipv6",
            Self::Mac(_) => "mac",
        }
    }

    /// The string form of the address.
    pub fn value(&self) -> &str {
        match self {
            Self::IPv4(s) | Self::IPv6(s) | Self::Mac(s) => s,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}
