//! Pairwise script-result diffs.

use crate::align::{merge_join, Aligned};
use crate::model::ScriptResult;

/// A pairing of script results with the same id from two scans. One side is
/// `None` when the script ran in only one scan.
///
/// The pair itself carries no cost; parents count the pairs for which
/// [`ScriptResultDiff::is_change`] holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResultDiff {
    pub sr_a: Option<ScriptResult>,
    pub sr_b: Option<ScriptResult>,
}

impl ScriptResultDiff {
    /// Whether this pair represents an actual difference (an unmatched
    /// result, or matched results with differing output). Verbose runs also
    /// carry unchanged pairs for display; those return false here and never
    /// contribute cost.
    pub fn is_change(&self) -> bool {
        match (&self.sr_a, &self.sr_b) {
            (Some(a), Some(b)) => a.output != b.output,
            _ => true,
        }
    }

    /// Pair up two id-sorted script result lists. Unmatched entries become
    /// one-sided diffs; matched entries are kept when their output differs,
    /// or unconditionally in verbose mode.
    pub fn diff_lists(a: &[ScriptResult], b: &[ScriptResult], verbose: bool) -> Vec<Self> {
        merge_join(a, b, |sr| sr.id.clone(), |sr| sr.id.clone())
            .filter_map(|pair| match pair {
                Aligned::Matched(x, y) => (x.output != y.output || verbose).then(|| Self {
                    sr_a: Some(x.clone()),
                    sr_b: Some(y.clone()),
                }),
                Aligned::LeftOnly(x) => Some(Self {
                    sr_a: Some(x.clone()),
                    sr_b: None,
                }),
                Aligned::RightOnly(y) => Some(Self {
                    sr_a: None,
                    sr_b: Some(y.clone()),
                }),
            })
            .collect()
    }

    /// Count of actual changes in a diff list, the cost contribution to the
    /// parent entity.
    pub fn change_count(diffs: &[Self]) -> u64 {
        diffs.iter().filter(|d| d.is_change()).count() as u64
    }
}
