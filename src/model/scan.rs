//! A whole scan: one invocation of the scanner.

use chrono::{DateTime, Local};

use super::{Host, ScriptResult};

/// A single scan, corresponding to a single invocation of the scanner. It
/// is a container for a list of hosts plus run-level metadata and pre/post
/// scan script results.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub scanner: Option<String>,
    pub version: Option<String>,
    pub args: Option<String>,
    pub start_date: Option<DateTime<Local>>,
    pub end_date: Option<DateTime<Local>>,
    pub hosts: Vec<Host>,
    pub pre_script_results: Vec<ScriptResult>,
    pub post_script_results: Vec<ScriptResult>,
}

impl Scan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts ordered by identity, ready for merge-join pairing. The order
    /// among colliding identities is unspecified.
    pub fn sorted_hosts(&self) -> Vec<&Host> {
        let mut hosts: Vec<&Host> = self.hosts.iter().collect();
        hosts.sort_by_cached_key(|h| h.id());
        hosts
    }

    /// A startup banner more or less like the scanner's own, e.g.
    /// `"Nmap 7.95 scan initiated Mon Jun 01 10:00:00 2026 as: nmap -A host"`.
    pub fn format_banner(&self) -> String {
        let scanner = match self.scanner.as_deref() {
            Some("nmap") | None => "Nmap",
            Some(other) => other,
        };
        let mut parts: Vec<String> = vec![scanner.to_string()];
        if let Some(version) = &self.version {
            parts.push(version.clone());
        }
        parts.push("scan".to_string());
        if let Some(start) = &self.start_date {
            parts.push(format!(
                "initiated {}",
                start.format("%a %b %d %H:%M:%S %Y")
            ));
        }
        if let Some(args) = &self.args {
            parts.push(format!("as: {args}"));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    #[test]
    fn test_sorted_hosts_by_id() {
        let mut scan = Scan::new();

        let mut h1 = Host::new();
        h1.add_address(Address::IPv4("10.0.0.9".to_string()));
        let mut h2 = Host::new();
        h2.add_address(Address::IPv4("10.0.0.1".to_string()));
        scan.hosts.push(h1);
        scan.hosts.push(h2);

        let sorted = scan.sorted_hosts();
        assert_eq!(sorted[0].format_name(), "10.0.0.1");
        assert_eq!(sorted[1].format_name(), "10.0.0.9");
    }

    #[test]
    fn test_banner_defaults_to_nmap() {
        let mut scan = Scan::new();
        assert_eq!(scan.format_banner(), "Nmap scan");

        scan.scanner = Some("nmap".to_string());
        scan.version = Some("7.95".to_string());
        scan.args = Some("nmap -A example.com".to_string());
        assert_eq!(scan.format_banner(), "Nmap 7.95 scan as: nmap -A example.com");
    }

    #[test]
    fn test_banner_keeps_foreign_scanner_name() {
        let scan = Scan {
            scanner: Some("masscan".to_string()),
            ..Scan::new()
        };
        assert_eq!(scan.format_banner(), "masscan scan");
    }
}
