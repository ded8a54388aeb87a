//! Hosts and host identity.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};

use super::{Address, Port, PortSpec, ScriptResult};

static NEXT_HOST_SERIAL: AtomicU64 = AtomicU64::new(0);

/// The key used to decide whether two hosts from different scans are "the
/// same" host: the least address if any, else the least hostname, else a
/// process-unique serial. Anonymous hosts therefore never match each other
/// across scans.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostId {
    Address(Address),
    Hostname(String),
    Anonymous(u64),
}

/// A single host: a state, addresses, host names, a map from port specs to
/// ports, compressed "extraports" counts, OS matches and script results.
/// Host states are strings, or `None` for "unknown".
#[derive(Debug, Clone)]
pub struct Host {
    pub state: Option<String>,
    pub addresses: IndexSet<Address>,
    pub hostnames: IndexSet<String>,
    pub ports: IndexMap<PortSpec, Port>,
    pub extraports: IndexMap<String, u64>,
    pub os: Vec<String>,
    pub script_results: Vec<ScriptResult>,
    serial: u64,
}

impl Host {
    /// A host with no attributes at all. Also the placeholder for "absent
    /// from that scan" during diffing, recognizable by its `None` state.
    pub fn new() -> Self {
        Self {
            state: None,
            addresses: IndexSet::new(),
            hostnames: IndexSet::new(),
            ports: IndexMap::new(),
            extraports: IndexMap::new(),
            os: Vec::new(),
            script_results: Vec::new(),
            serial: NEXT_HOST_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The identity used to pair hosts across scans.
    pub fn id(&self) -> HostId {
        if let Some(addr) = self.addresses.iter().min() {
            return HostId::Address(addr.clone());
        }
        if let Some(name) = self.hostnames.iter().min() {
            return HostId::Hostname(name.clone());
        }
        HostId::Anonymous(self.serial)
    }

    /// A human-readable identifier for this host, e.g.
    /// `"example.com (203.0.113.9)"`.
    pub fn format_name(&self) -> String {
        let mut addresses: Vec<&Address> = self.addresses.iter().collect();
        addresses.sort();
        let address_s = addresses
            .iter()
            .map(|a| a.value())
            .collect::<Vec<_>>()
            .join(", ");

        let mut hostnames: Vec<&str> = self.hostnames.iter().map(String::as_str).collect();
        hostnames.sort_unstable();
        let hostname_s = hostnames.join(", ");

        match (hostname_s.is_empty(), address_s.is_empty()) {
            (false, false) => format!("{hostname_s} ({address_s})"),
            (false, true) => hostname_s,
            (true, false) => address_s,
            (true, true) => "<no name>".to_string(),
        }
    }

    pub fn add_port(&mut self, port: Port) {
        self.ports.insert(port.spec.clone(), port);
    }

    pub fn add_address(&mut self, address: Address) {
        self.addresses.insert(address);
    }

    pub fn add_hostname(&mut self, hostname: impl Into<String>) {
        self.hostnames.insert(hostname.into());
    }

    /// Whether a port state is covered by this host's extraports summary.
    /// An unknown (`None`) state always counts as covered.
    pub fn is_extraports(&self, state: Option<&str>) -> bool {
        match state {
            None => true,
            Some(s) => self.extraports.contains_key(s),
        }
    }

    /// The "Not shown: ..." summary, largest bucket first, e.g.
    /// `"995 filtered ports, 3 closed ports"`.
    pub fn extraports_string(&self) -> String {
        let mut buckets: Vec<(u64, &str)> = self
            .extraports
            .iter()
            .map(|(state, count)| (*count, state.as_str()))
            .collect();
        buckets.sort_unstable_by(|a, b| b.cmp(a));
        buckets
            .iter()
            .map(|(count, state)| format!("{count} {state} ports"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}
