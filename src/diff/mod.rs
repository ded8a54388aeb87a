//! Structural diff objects and the comparison engine.
//!
//! Diff objects own ("before", "after") copies of the entities they compare
//! plus an additive integer cost: 0 means no reportable difference. Costs
//! compose up the tree — a [`HostDiff`] sums its own structural deltas with
//! every included [`PortDiff`], the OS edit script and the script-result
//! changes; [`DiffEngine`] sums host diffs with the pre/post-scan script
//! sections into the total that becomes the process outcome.

mod engine;
mod host;
mod port;
mod script;

pub use engine::{DiffEngine, ScanDiffResult};
pub use host::HostDiff;
pub use port::PortDiff;
pub use script::ScriptResultDiff;
