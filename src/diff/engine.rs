//! The comparison orchestrator.

use crate::align::{merge_join, Aligned};
use crate::config::DiffOptions;
use crate::model::{Host, Scan};

use super::{HostDiff, ScriptResultDiff};

/// Drives one end-to-end comparison of two scans.
///
/// The engine is a pure function over two materialized scan trees: it sorts
/// both host lists by identity, aligns pre-scan script results, host pairs
/// and post-scan script results, and accumulates the total cost that the
/// caller turns into the process outcome.
pub struct DiffEngine {
    options: DiffOptions,
}

/// The computed diff of two scans, consumed by the renderers.
///
/// `hosts` holds only the host diffs selected for reporting: those with
/// nonzero cost, or every pair in verbose mode. Hosts whose only
/// differences sit in suppressed extraports states carry cost 0 and are
/// therefore never emitted on their own account.
#[derive(Debug, Clone)]
pub struct ScanDiffResult {
    pub pre_scripts: Vec<ScriptResultDiff>,
    pub hosts: Vec<HostDiff>,
    pub post_scripts: Vec<ScriptResultDiff>,
    pub cost: u64,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Compare the "before" scan `a` with the "after" scan `b`.
    pub fn diff(&self, scan_a: &Scan, scan_b: &Scan) -> ScanDiffResult {
        let pre_scripts = ScriptResultDiff::diff_lists(
            &scan_a.pre_script_results,
            &scan_b.pre_script_results,
            self.options.verbose,
        );
        let mut cost = ScriptResultDiff::change_count(&pre_scripts);

        // Hosts pair by exact identity only; a host whose id changed shows
        // up as one removal and one addition.
        let mut hosts = Vec::new();
        for pair in merge_join(
            scan_a.sorted_hosts(),
            scan_b.sorted_hosts(),
            |h| h.id(),
            |h| h.id(),
        ) {
            let (host_a, host_b) = match pair {
                Aligned::Matched(a, b) => (a.clone(), b.clone()),
                Aligned::LeftOnly(a) => (a.clone(), Host::new()),
                Aligned::RightOnly(b) => (Host::new(), b.clone()),
            };
            let host_diff = HostDiff::compute(host_a, host_b, &self.options);
            cost += host_diff.cost;
            if host_diff.cost > 0 || self.options.verbose {
                hosts.push(host_diff);
            }
        }

        let post_scripts = ScriptResultDiff::diff_lists(
            &scan_a.post_script_results,
            &scan_b.post_script_results,
            self.options.verbose,
        );
        cost += ScriptResultDiff::change_count(&post_scripts);

        ScanDiffResult {
            pre_scripts,
            hosts,
            post_scripts,
            cost,
        }
    }
}
