//! Scan report parsing.
//!
//! The parser populates the [`Scan`](crate::model::Scan) tree incrementally
//! from Nmap XML. Malformed or missing attributes never abort a parse: the
//! affected element is skipped or defaulted and a warning is recorded (and
//! logged through `tracing`). Only structural problems — an unreadable
//! file, XML that does not parse — are fatal.

mod nmap_xml;

pub use nmap_xml::{ParsedScan, ScanParser};

use std::fs;
use std::path::Path;

use crate::error::{Result, ScanDiffError};
use crate::model::Scan;

/// Load a scan from an Nmap XML file.
pub fn load_scan(path: &Path) -> Result<Scan> {
    let content = fs::read_to_string(path).map_err(|e| ScanDiffError::io(path, e))?;
    parse_scan_str(&content)
}

/// Parse a scan from an Nmap XML string, discarding the warning list (each
/// warning has already been logged when it was recorded).
pub fn parse_scan_str(content: &str) -> Result<Scan> {
    ScanParser::new().parse(content).map(|parsed| parsed.scan)
}
