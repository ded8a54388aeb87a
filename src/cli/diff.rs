//! Diff command handler.
//!
//! Loads the two scan reports, runs the comparison engine, renders the
//! selected report and classifies the outcome as an exit code.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use crate::config::DiffConfig;
use crate::diff::DiffEngine;
use crate::parsers::load_scan;
use crate::reports::create_renderer;

use super::exit_codes;

/// Run the diff, returning the desired exit code.
///
/// The caller is responsible for turning the returned code into
/// `std::process::exit`; errors bubble up so the binary can map them to
/// [`exit_codes::ERROR`] in one place.
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    let scan_a = load_scan(&config.path_a)
        .with_context(|| format!("can't read scan report {}", config.path_a.display()))?;
    let scan_b = load_scan(&config.path_b)
        .with_context(|| format!("can't read scan report {}", config.path_b.display()))?;

    tracing::debug!(
        hosts_a = scan_a.hosts.len(),
        hosts_b = scan_b.hosts.len(),
        "parsed both scan reports"
    );

    let diff = DiffEngine::new(config.options).diff(&scan_a, &scan_b);
    let renderer = create_renderer(config.output.format, config.options);

    match &config.output.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("can't create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            renderer.render(&scan_a, &scan_b, &diff, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            renderer.render(&scan_a, &scan_b, &diff, &mut lock)?;
        }
    }

    if diff.cost == 0 {
        Ok(exit_codes::EQUAL)
    } else {
        Ok(exit_codes::DIFFERENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiffOptions, OutputConfig};
    use crate::reports::OutputFormat;
    use std::io::Write as _;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    const SCAN_UP: &str = r#"<nmaprun>
<host><status state="up"/><address addr="10.0.0.1" addrtype="ipv4"/></host>
</nmaprun>"#;

    const SCAN_DOWN: &str = r#"<nmaprun>
<host><status state="down"/><address addr="10.0.0.1" addrtype="ipv4"/></host>
</nmaprun>"#;

    fn config_for(a: &tempfile::NamedTempFile, b: &tempfile::NamedTempFile) -> DiffConfig {
        DiffConfig {
            path_a: a.path().to_path_buf(),
            path_b: b.path().to_path_buf(),
            output: OutputConfig {
                format: OutputFormat::Text,
                file: None,
            },
            options: DiffOptions::default(),
        }
    }

    #[test]
    fn test_equal_scans_exit_zero() {
        let a = write_temp(SCAN_UP);
        let b = write_temp(SCAN_UP);
        let code = run_diff(config_for(&a, &b)).expect("diff runs");
        assert_eq!(code, exit_codes::EQUAL);
    }

    #[test]
    fn test_differing_scans_exit_one() {
        let a = write_temp(SCAN_UP);
        let b = write_temp(SCAN_DOWN);
        let code = run_diff(config_for(&a, &b)).expect("diff runs");
        assert_eq!(code, exit_codes::DIFFERENT);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let a = write_temp(SCAN_UP);
        let mut config = config_for(&a, &a);
        config.path_b = "/nonexistent/scan.xml".into();
        assert!(run_diff(config).is_err());
    }

    #[test]
    fn test_output_file_is_written() {
        let a = write_temp(SCAN_UP);
        let b = write_temp(SCAN_DOWN);
        let out = tempfile::NamedTempFile::new().expect("create output file");

        let mut config = config_for(&a, &b);
        config.output.file = Some(out.path().to_path_buf());
        let code = run_diff(config).expect("diff runs");

        assert_eq!(code, exit_codes::DIFFERENT);
        let written = std::fs::read_to_string(out.path()).expect("read output");
        assert!(written.contains("-Host is up."));
        assert!(written.contains("+Host is down."));
    }
}
