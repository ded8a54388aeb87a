//! Configuration types threaded through the engine and renderers.
//!
//! Verbosity is an explicit value handed to constructors, never ambient
//! global state.

use std::path::PathBuf;

use crate::reports::OutputFormat;

/// Behavior switches shared by the diff engine and the renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Report everything, including unchanged entities, instead of only
    /// differences.
    pub verbose: bool,
}

/// Where and how to emit the report.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Output file path (stdout if not specified)
    pub file: Option<PathBuf>,
}

/// Full configuration for one diff invocation.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Path to the "before" scan report
    pub path_a: PathBuf,
    /// Path to the "after" scan report
    pub path_b: PathBuf,
    pub output: OutputConfig,
    pub options: DiffOptions,
}
