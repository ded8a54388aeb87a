//! **A library for comparing structured network-scan reports.**
//!
//! `scandiff` reads two snapshots of the same target population — hosts,
//! ports, services, OS fingerprints, script output — and computes a
//! minimal, consistent description of what changed between them. It powers
//! the `scandiff` command-line tool and can be embedded as a library.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the immutable-after-construction scan tree
//!   ([`Scan`], [`Host`], [`Port`], [`Service`], [`ScriptResult`],
//!   [`Address`]). Entity ordering rules double as diff identities.
//! - **[`parsers`]**: a tolerant streaming Nmap-XML reader. Bad attributes
//!   become warnings and defaults, never aborts.
//! - **[`align`]**: the two generic alignment strategies — a merge-join
//!   over id-sorted sequences, and an LCS edit script over ordered lists.
//! - **[`diff`]**: the diff objects and the [`DiffEngine`] orchestrator.
//!   Every diff carries an additive integer cost; 0 means "no reportable
//!   difference", and the total cost becomes the process outcome.
//! - **[`reports`]**: the text and XML rendering strategies, both walking
//!   the same [`ScanDiffResult`] tree.
//!
//! ## Diffing two scans
//!
//! ```no_run
//! use scandiff::{load_scan, DiffEngine, DiffOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let before = load_scan(Path::new("yesterday.xml"))?;
//!     let after = load_scan(Path::new("today.xml"))?;
//!
//!     let engine = DiffEngine::new(DiffOptions::default());
//!     let diff = engine.diff(&before, &after);
//!
//!     println!("total cost: {}", diff.cost);
//!     for host_diff in &diff.hosts {
//!         println!("changed: {}", host_diff.host_a.format_name());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used)]
#![allow(
    // old/new-style variable pairs (host_a/host_b, sr_a/sr_b) are the
    // domain vocabulary here
    clippy::similar_names
)]

pub mod align;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod parsers;
pub mod reports;

// Re-export main types for convenience
pub use config::{DiffConfig, DiffOptions, OutputConfig};
pub use diff::{DiffEngine, HostDiff, PortDiff, ScanDiffResult, ScriptResultDiff};
pub use error::{Result, ScanDiffError};
pub use model::{Address, Host, HostId, Port, PortSpec, Scan, ScriptResult, Service};
pub use parsers::{load_scan, parse_scan_str, ParsedScan, ScanParser};
pub use reports::{create_renderer, DiffRenderer, OutputFormat, RenderError};
