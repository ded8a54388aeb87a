//! Host-level diffs.

use std::collections::BTreeSet;

use crate::align::{diff_slices, OpTag, Opcode};
use crate::config::DiffOptions;
use crate::model::{Host, Port, PortSpec};

use super::{PortDiff, ScriptResultDiff};

/// A diff of two hosts: the hosts themselves, flags describing what
/// changed, the included port diffs, the OS edit script and the host
/// script-result diffs.
///
/// A host present in only one scan is paired with the empty placeholder
/// host (`None` state); renderers report such a host wholesale instead of
/// decomposing it against the placeholder's internals.
#[derive(Debug, Clone)]
pub struct HostDiff {
    pub host_a: Host,
    pub host_b: Host,
    pub state_changed: bool,
    pub id_changed: bool,
    pub os_changed: bool,
    pub extraports_changed: bool,
    pub port_diffs: Vec<PortDiff>,
    pub os_ops: Vec<Opcode>,
    pub script_result_diffs: Vec<ScriptResultDiff>,
    pub cost: u64,
}

impl HostDiff {
    pub fn compute(host_a: Host, host_b: Host, options: &DiffOptions) -> Self {
        let mut cost = 0;

        let state_changed = host_a.state != host_b.state;
        if state_changed {
            cost += 1;
        }

        // Identity is the address and hostname sets together; IndexSet
        // equality ignores insertion order.
        let id_changed =
            host_a.addresses != host_b.addresses || host_a.hostnames != host_b.hostnames;
        if id_changed {
            cost += 1;
        }

        // Ports are only compared spec-to-spec; a service that moved to
        // another port shows up as one removal and one addition.
        let all_specs: BTreeSet<&PortSpec> =
            host_a.ports.keys().chain(host_b.ports.keys()).collect();
        let mut port_diffs = Vec::new();
        for spec in all_specs {
            let port_a = host_a
                .ports
                .get(spec)
                .cloned()
                .unwrap_or_else(|| Port::new(spec.clone()));
            let port_b = host_b
                .ports
                .get(spec)
                .cloned()
                .unwrap_or_else(|| Port::new(spec.clone()));
            let diff = PortDiff::compute(port_a, port_b, options.verbose);
            if Self::include_diff(&host_a, &host_b, &diff, options) {
                cost += diff.cost;
                port_diffs.push(diff);
            }
        }

        let os_ops = diff_slices(&host_a.os, &host_b.os);
        let os_cost: u64 = os_ops
            .iter()
            .filter(|op| op.tag != OpTag::Equal)
            .map(|op| op.element_count() as u64)
            .sum();
        let os_changed = os_cost > 0;
        cost += os_cost;

        // Extraports compare as an unordered set of (state, count) pairs.
        let extraports_changed = host_a.extraports != host_b.extraports;
        if extraports_changed {
            cost += 1;
        }

        let script_result_diffs = ScriptResultDiff::diff_lists(
            &host_a.script_results,
            &host_b.script_results,
            options.verbose,
        );
        cost += ScriptResultDiff::change_count(&script_result_diffs);

        Self {
            host_a,
            host_b,
            state_changed,
            id_changed,
            os_changed,
            extraports_changed,
            port_diffs,
            os_ops,
            script_result_diffs,
            cost,
        }
    }

    /// A port diff is dropped entirely when both sides file the port under a
    /// suppressed extraports state; such ports represent mere membership in
    /// a compressed bucket. One-side-only coverage does not suppress.
    /// Verbose mode includes every surviving diff, even at cost 0.
    fn include_diff(host_a: &Host, host_b: &Host, diff: &PortDiff, options: &DiffOptions) -> bool {
        if host_a.is_extraports(diff.port_a.state.as_deref())
            && host_b.is_extraports(diff.port_b.state.as_deref())
        {
            return false;
        }
        options.verbose || diff.cost > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, Service};

    fn options() -> DiffOptions {
        DiffOptions::default()
    }

    fn host_with_port(state: &str) -> Host {
        let mut host = Host::new();
        host.state = Some("up".to_string());
        host.add_address(Address::IPv4("10.0.0.1".to_string()));
        let mut port = Port::new(PortSpec::new(80, "tcp"));
        port.state = Some(state.to_string());
        port.service = Service {
            name: Some("http".to_string()),
            ..Service::default()
        };
        host.add_port(port);
        host
    }

    #[test]
    fn test_identical_hosts_cost_zero() {
        let diff = HostDiff::compute(host_with_port("open"), host_with_port("open"), &options());
        assert_eq!(diff.cost, 0);
        assert!(diff.port_diffs.is_empty());
        assert!(!diff.state_changed && !diff.id_changed);
    }

    #[test]
    fn test_port_state_flip_costs_one() {
        let diff = HostDiff::compute(host_with_port("open"), host_with_port("closed"), &options());
        assert_eq!(diff.cost, 1);
        assert_eq!(diff.port_diffs.len(), 1);
    }

    #[test]
    fn test_host_state_and_id_changes() {
        let mut a = host_with_port("open");
        a.state = Some("up".to_string());
        let mut b = host_with_port("open");
        b.state = Some("down".to_string());
        b.add_address(Address::IPv4("10.0.0.2".to_string()));

        let diff = HostDiff::compute(a, b, &options());
        assert!(diff.state_changed);
        assert!(diff.id_changed);
        assert_eq!(diff.cost, 2);
    }

    #[test]
    fn test_extraports_suppression_is_both_sided() {
        // Port 22 is explicitly open in a; in b it is absent but both sides
        // summarize closed/unknown ports via extraports.
        let mut a = Host::new();
        a.state = Some("up".to_string());
        let mut ssh = Port::new(PortSpec::new(22, "tcp"));
        ssh.state = Some("open".to_string());
        a.add_port(ssh);
        a.extraports.insert("closed".to_string(), 995);

        let mut b = Host::new();
        b.state = Some("up".to_string());
        b.extraports.insert("closed".to_string(), 995);

        // The synthesized absent port has unknown state, which counts as
        // covered on b's side, but "open" is not covered on a's side, so
        // the diff survives.
        let diff = HostDiff::compute(a.clone(), b.clone(), &options());
        assert_eq!(diff.port_diffs.len(), 1);

        // Flip the explicit port to a state both sides cover: suppressed.
        let mut a2 = a.clone();
        let closed = {
            let mut p = Port::new(PortSpec::new(22, "tcp"));
            p.state = Some("closed".to_string());
            p
        };
        a2.ports.clear();
        a2.add_port(closed);
        let mut b2 = b.clone();
        b2.extraports.insert("closed".to_string(), 995);

        let diff = HostDiff::compute(a2, b2, &options());
        assert!(diff.port_diffs.is_empty());
        assert_eq!(diff.cost, 0);
    }

    #[test]
    fn test_os_change_costs_per_element() {
        let mut a = host_with_port("open");
        a.os = vec!["Linux 5.4".to_string(), "Linux 5.10".to_string()];
        let mut b = host_with_port("open");
        b.os = vec!["Linux 5.10".to_string()];

        let diff = HostDiff::compute(a, b, &options());
        assert!(diff.os_changed);
        assert_eq!(diff.cost, 1);
    }

    #[test]
    fn test_extraports_change_costs_one() {
        let mut a = host_with_port("open");
        a.extraports.insert("filtered".to_string(), 100);
        let mut b = host_with_port("open");
        b.extraports.insert("filtered".to_string(), 99);

        let diff = HostDiff::compute(a, b, &options());
        assert!(diff.extraports_changed);
        assert_eq!(diff.cost, 1);
    }

    #[test]
    fn test_absent_host_reports_wholesale() {
        let diff = HostDiff::compute(host_with_port("open"), Host::new(), &options());
        // state up -> unknown, identity sets differ
        assert!(diff.state_changed);
        assert!(diff.id_changed);
        assert!(diff.cost >= 2);
        assert!(diff.host_b.state.is_none());
    }
}
