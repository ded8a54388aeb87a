//! Report rendering for computed scan diffs.
//!
//! Two independent strategies consume the same [`ScanDiffResult`] tree:
//!
//! - [`TextRenderer`]: a line-oriented report with ` `/`-`/`+` diff
//!   indicators and fixed-column port tables.
//! - [`XmlRenderer`]: a structured markup document wrapping differences in
//!   paired `<a>`/`<b>` sibling elements.
//!
//! Renderers never perform I/O beyond the writer they are handed; all of
//! the "what is interesting" policy lives in the diff objects themselves.

pub mod table;
mod text;
mod xml;

pub use text::TextRenderer;
pub use xml::XmlRenderer;

use std::io::Write;

use thiserror::Error;

use crate::config::DiffOptions;
use crate::diff::ScanDiffResult;
use crate::model::Scan;

/// Errors that can occur while rendering a report
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writer error: {0}")]
    Xml(String),
}

/// Output format for diff reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Line-oriented text report
    #[default]
    Text,
    /// Structured XML report
    Xml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Xml => write!(f, "xml"),
        }
    }
}

/// Trait for diff report renderers
pub trait DiffRenderer {
    /// Render the computed diff of `scan_a` and `scan_b` to `out`.
    fn render(
        &self,
        scan_a: &Scan,
        scan_b: &Scan,
        diff: &ScanDiffResult,
        out: &mut dyn Write,
    ) -> Result<(), RenderError>;

    /// The format this renderer produces
    fn format(&self) -> OutputFormat;
}

/// Create a renderer for the given format
#[must_use]
pub fn create_renderer(format: OutputFormat, options: DiffOptions) -> Box<dyn DiffRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::new(options)),
        OutputFormat::Xml => Box::new(XmlRenderer::new(options)),
    }
}
