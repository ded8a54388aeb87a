//! Ports and port specifications.

use std::fmt;

use super::{ScriptResult, Service};

/// A port specification: the `(number, protocol)` pair that identifies a
/// port uniquely within a host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortSpec {
    pub number: u16,
    pub protocol: String,
}

impl PortSpec {
    pub fn new(number: u16, protocol: impl Into<String>) -> Self {
        Self {
            number,
            protocol: protocol.into(),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.protocol)
    }
}

/// A single port: a specification, a state, a service version and its
/// script results. Port states are strings, or `None` for "unknown".
///
/// Ports carry no intrinsic ordering; diffing and rendering sort them by
/// [`PortSpec`] where needed, and structural equality covers the full
/// contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub spec: PortSpec,
    pub state: Option<String>,
    pub service: Service,
    pub script_results: Vec<ScriptResult>,
}

impl Port {
    /// A port with the given spec, unknown state and empty service. This is
    /// also the synthesized placeholder for a port absent from one scan.
    pub fn new(spec: PortSpec) -> Self {
        Self {
            spec,
            state: None,
            service: Service::default(),
            script_results: Vec::new(),
        }
    }

    /// The STATE column string, `"unknown"` when no state was reported.
    pub fn state_string(&self) -> String {
        self.state.clone().unwrap_or_else(|| "unknown".to_string())
    }

    /// The PORT column string, e.g. `"80/tcp"`.
    pub fn spec_string(&self) -> String {
        self.spec.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_ordering() {
        let a = PortSpec::new(22, "tcp");
        let b = PortSpec::new(80, "tcp");
        let c = PortSpec::new(80, "udp");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_spec_string() {
        let port = Port::new(PortSpec::new(443, "tcp"));
        assert_eq!(port.spec_string(), "443/tcp");
        assert_eq!(port.state_string(), "unknown");
    }

    #[test]
    fn test_placeholder_port_is_empty() {
        let port = Port::new(PortSpec::new(8080, "tcp"));
        assert!(port.state.is_none());
        assert!(port.service.is_empty());
        assert!(port.script_results.is_empty());
    }
}
