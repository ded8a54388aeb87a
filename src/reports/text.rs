//! Line-oriented text rendering.
//!
//! Unchanged lines carry a leading space, lines only in the "before" scan a
//! leading `-`, lines only in the "after" scan a leading `+`.

use std::io::Write;

use crate::align::{diff_slices, OpTag};
use crate::config::DiffOptions;
use crate::diff::{HostDiff, PortDiff, ScanDiffResult, ScriptResultDiff};
use crate::model::{Host, Scan, ScriptResult};

use super::table::Table;
use super::{DiffRenderer, OutputFormat, RenderError};

/// The plain-text report strategy.
pub struct TextRenderer {
    options: DiffOptions,
}

impl TextRenderer {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    fn write_script_section(
        &self,
        out: &mut dyn Write,
        title: &str,
        results_a: &[ScriptResult],
        results_b: &[ScriptResult],
        diffs: &[ScriptResultDiff],
    ) -> Result<(), RenderError> {
        let mut table = Table::new("*");
        for diff in diffs {
            self.append_script_diff(&mut table, diff);
        }
        if table.is_empty() {
            return Ok(());
        }

        let mark = if results_b.is_empty() {
            '-'
        } else if results_a.is_empty() {
            '+'
        } else {
            ' '
        };
        writeln!(out)?;
        writeln!(out, "{mark}{title}:")?;
        writeln!(out, "{table}")?;
        Ok(())
    }

    /// Line-diff one script pair into raw table rows.
    fn append_script_diff(&self, table: &mut Table, diff: &ScriptResultDiff) {
        let a_lines = diff.sr_a.as_ref().map(ScriptResult::lines).unwrap_or_default();
        let b_lines = diff.sr_b.as_ref().map(ScriptResult::lines).unwrap_or_default();
        if a_lines == b_lines && !self.options.verbose {
            return;
        }

        for op in diff_slices(&a_lines, &b_lines) {
            if matches!(op.tag, OpTag::Replace | OpTag::Delete) {
                for line in &a_lines[op.a.clone()] {
                    table.append_raw(format!("-{line}"));
                }
            }
            if matches!(op.tag, OpTag::Replace | OpTag::Insert) {
                for line in &b_lines[op.b.clone()] {
                    table.append_raw(format!("+{line}"));
                }
            }
            if op.tag == OpTag::Equal {
                for line in &a_lines[op.a.clone()] {
                    table.append_raw(format!(" {line}"));
                }
            }
        }
    }

    fn append_port_diff(&self, table: &mut Table, diff: &PortDiff, host_a: &Host, host_b: &Host) {
        let a_columns = port_columns(&diff.port_a);
        let b_columns = port_columns(&diff.port_b);

        if a_columns == b_columns {
            // The port looks the same in both scans; show it as context when
            // its scripts changed, or in verbose mode.
            if self.options.verbose || !diff.script_result_diffs.is_empty() {
                table.append(row_with_mark(" ", a_columns));
            }
        } else {
            if !host_a.is_extraports(diff.port_a.state.as_deref()) {
                table.append(row_with_mark("-", a_columns));
            }
            if !host_b.is_extraports(diff.port_b.state.as_deref()) {
                table.append(row_with_mark("+", b_columns));
            }
        }

        for sr_diff in &diff.script_result_diffs {
            self.append_script_diff(table, sr_diff);
        }
    }

    fn write_host_diff(&self, out: &mut dyn Write, diff: &HostDiff) -> Result<(), RenderError> {
        let host_a = &diff.host_a;
        let host_b = &diff.host_b;

        // Names and addresses.
        if diff.id_changed {
            if host_a.state.is_some() {
                writeln!(out, "-{}:", host_a.format_name())?;
            }
            if host_b.state.is_some() {
                writeln!(out, "+{}:", host_b.format_name())?;
            }
        } else {
            writeln!(out, " {}:", host_a.format_name())?;
        }

        // State.
        if diff.state_changed {
            if let Some(state) = &host_a.state {
                writeln!(out, "-Host is {state}.")?;
            }
            if let Some(state) = &host_b.state {
                writeln!(out, "+Host is {state}.")?;
            }
        } else if self.options.verbose {
            if let Some(state) = &host_b.state {
                writeln!(out, " Host is {state}.")?;
            }
        }

        // Extraports.
        if diff.extraports_changed {
            if !host_a.extraports.is_empty() {
                writeln!(out, "-Not shown: {}", host_a.extraports_string())?;
            }
            if !host_b.extraports.is_empty() {
                writeln!(out, "+Not shown: {}", host_b.extraports_string())?;
            }
        } else if self.options.verbose && !host_a.extraports.is_empty() {
            writeln!(out, " Not shown: {}", host_a.extraports_string())?;
        }

        // Port table.
        let mut table = Table::new("** * * *");
        let mark = if host_a.state.is_none() {
            "+"
        } else if host_b.state.is_none() {
            "-"
        } else {
            " "
        };
        table.append(row_with_mark(
            mark,
            vec![
                Some("PORT".to_string()),
                Some("STATE".to_string()),
                Some("SERVICE".to_string()),
                Some("VERSION".to_string()),
            ],
        ));
        for port_diff in &diff.port_diffs {
            self.append_port_diff(&mut table, port_diff, host_a, host_b);
        }
        if table.len() > 1 {
            writeln!(out, "{table}")?;
        }

        // OS changes.
        if diff.os_changed || self.options.verbose {
            if !host_a.os.is_empty() {
                if !host_b.os.is_empty() {
                    writeln!(out, " OS details:")?;
                } else {
                    writeln!(out, "-OS details:")?;
                }
            } else if !host_b.os.is_empty() {
                writeln!(out, "+OS details:")?;
            }
            for op in &diff.os_ops {
                if matches!(op.tag, OpTag::Replace | OpTag::Delete) {
                    for os in &host_a.os[op.a.clone()] {
                        writeln!(out, "-  {os}")?;
                    }
                }
                if matches!(op.tag, OpTag::Replace | OpTag::Insert) {
                    for os in &host_b.os[op.b.clone()] {
                        writeln!(out, "+  {os}")?;
                    }
                }
                if op.tag == OpTag::Equal {
                    for os in &host_a.os[op.a.clone()] {
                        writeln!(out, "   {os}")?;
                    }
                }
            }
        }

        self.write_script_section(
            out,
            "Host script results",
            &host_a.script_results,
            &host_b.script_results,
            &diff.script_result_diffs,
        )?;

        Ok(())
    }
}

impl DiffRenderer for TextRenderer {
    fn render(
        &self,
        scan_a: &Scan,
        scan_b: &Scan,
        diff: &ScanDiffResult,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let banner_a = scan_a.format_banner();
        let banner_b = scan_b.format_banner();
        if banner_a != banner_b {
            writeln!(out, "-{banner_a}")?;
            writeln!(out, "+{banner_b}")?;
        } else if self.options.verbose {
            writeln!(out, " {banner_a}")?;
        }

        self.write_script_section(
            out,
            "Pre-scan script results",
            &scan_a.pre_script_results,
            &scan_b.pre_script_results,
            &diff.pre_scripts,
        )?;

        for host_diff in &diff.hosts {
            writeln!(out)?;
            self.write_host_diff(out, host_diff)?;
        }

        self.write_script_section(
            out,
            "Post-scan script results",
            &scan_a.post_script_results,
            &scan_b.post_script_results,
            &diff.post_scripts,
        )?;

        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

fn port_columns(port: &crate::model::Port) -> Vec<Option<String>> {
    vec![
        Some(port.spec_string()),
        Some(port.state_string()),
        port.service.name_string(),
        port.service.version_string(),
    ]
}

fn row_with_mark(mark: &str, columns: Vec<Option<String>>) -> Vec<Option<String>> {
    let mut row = vec![Some(mark.to_string())];
    row.extend(columns);
    row
}
