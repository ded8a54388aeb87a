//! Port-level diffs.

use crate::model::Port;

use super::ScriptResultDiff;

/// A diff of two ports. Holds both ports and the cost of changing one into
/// the other; cost 0 means the ports are the same.
#[derive(Debug, Clone)]
pub struct PortDiff {
    pub port_a: Port,
    pub port_b: Port,
    pub script_result_diffs: Vec<ScriptResultDiff>,
    pub cost: u64,
}

impl PortDiff {
    /// Compare two ports. A port absent from one scan is passed in as the
    /// synthesized placeholder (`Port::new(spec)`: unknown state, empty
    /// service).
    pub fn compute(port_a: Port, port_b: Port, verbose: bool) -> Self {
        let mut cost = 0;

        if port_a.spec != port_b.spec {
            cost += 1;
        }
        if port_a.state != port_b.state {
            cost += 1;
        }
        if port_a.service != port_b.service {
            cost += 1;
        }

        let script_result_diffs =
            ScriptResultDiff::diff_lists(&port_a.script_results, &port_b.script_results, verbose);
        cost += ScriptResultDiff::change_count(&script_result_diffs);

        Self {
            port_a,
            port_b,
            script_result_diffs,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PortSpec, ScriptResult, Service};

    fn open_http(number: u16) -> Port {
        Port {
            spec: PortSpec::new(number, "tcp"),
            state: Some("open".to_string()),
            service: Service {
                name: Some("http".to_string()),
                ..Service::default()
            },
            script_results: Vec::new(),
        }
    }

    #[test]
    fn test_identical_ports_cost_zero() {
        let diff = PortDiff::compute(open_http(80), open_http(80), false);
        assert_eq!(diff.cost, 0);
    }

    #[test]
    fn test_state_change_costs_one() {
        let a = open_http(80);
        let mut b = open_http(80);
        b.state = Some("closed".to_string());

        let diff = PortDiff::compute(a, b, false);
        assert_eq!(diff.cost, 1);
    }

    #[test]
    fn test_absent_port_costs_state_and_service() {
        let a = open_http(80);
        let placeholder = Port::new(PortSpec::new(80, "tcp"));

        // state open -> unknown and service http -> empty
        let diff = PortDiff::compute(a, placeholder, false);
        assert_eq!(diff.cost, 2);
    }

    #[test]
    fn test_script_changes_add_to_cost() {
        let mut a = open_http(80);
        a.script_results.push(ScriptResult::new("http-title", "Old"));
        let mut b = open_http(80);
        b.script_results
            .push(ScriptResult::new("http-server-header", "nginx"));
        b.script_results.push(ScriptResult::new("http-title", "New"));

        let diff = PortDiff::compute(a, b, false);
        assert_eq!(diff.cost, 2);
        assert_eq!(diff.script_result_diffs.len(), 2);
    }
}
