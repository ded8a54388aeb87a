//! Structured XML rendering.
//!
//! The document wraps every difference in paired sibling `<a>` (before) and
//! `<b>` (after) elements; unchanged substructure is emitted unwrapped, and
//! only in verbose mode. A host missing from one scan is emitted wholesale
//! under a single `<a>` or `<b>`.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::align::OpTag;
use crate::config::DiffOptions;
use crate::diff::{HostDiff, PortDiff, ScanDiffResult, ScriptResultDiff};
use crate::model::{Address, Host, Port, Scan, ScriptResult, Service};

use super::{DiffRenderer, OutputFormat, RenderError};

/// Schema version tag stamped on the document root.
pub const XML_SCHEMA_VERSION: &str = "1";

/// The structured markup report strategy.
pub struct XmlRenderer {
    options: DiffOptions,
}

impl XmlRenderer {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }
}

impl DiffRenderer for XmlRenderer {
    fn render(
        &self,
        scan_a: &Scan,
        scan_b: &Scan,
        diff: &ScanDiffResult,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut w = XmlWriter::new(out);
        let verbose = self.options.verbose;

        w.decl()?;
        w.start_with("nmapdiff", &[("version", XML_SCHEMA_VERSION)])?;
        w.start("scandiff")?;

        if scanrun_differs(scan_a, scan_b) {
            w.start("a")?;
            write_scanrun(&mut w, scan_a)?;
            w.end("a")?;
            w.start("b")?;
            write_scanrun(&mut w, scan_b)?;
            w.end("b")?;
        } else if verbose {
            write_scanrun(&mut w, scan_a)?;
        }

        if !diff.pre_scripts.is_empty() || verbose {
            write_script_section(
                &mut w,
                "prescript",
                &scan_a.pre_script_results,
                &scan_b.pre_script_results,
                &diff.pre_scripts,
            )?;
        }

        for host_diff in &diff.hosts {
            self.write_host_diff(&mut w, host_diff)?;
        }

        if !diff.post_scripts.is_empty() || verbose {
            write_script_section(
                &mut w,
                "postscript",
                &scan_a.post_script_results,
                &scan_b.post_script_results,
                &diff.post_scripts,
            )?;
        }

        w.end("scandiff")?;
        w.end("nmapdiff")?;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Xml
    }
}

impl XmlRenderer {
    fn write_host_diff<W: Write>(
        &self,
        w: &mut XmlWriter<W>,
        diff: &HostDiff,
    ) -> Result<(), RenderError> {
        let verbose = self.options.verbose;
        let host_a = &diff.host_a;
        let host_b = &diff.host_b;

        w.start("hostdiff")?;

        // A host missing from one scan is reported wholesale, with no
        // sub-diff decomposition against the placeholder's internals.
        if host_a.state.is_none() || host_b.state.is_none() {
            if host_a.state.is_some() {
                w.start("a")?;
                write_host(w, host_a)?;
                w.end("a")?;
            } else if host_b.state.is_some() {
                w.start("b")?;
                write_host(w, host_b)?;
                w.end("b")?;
            }
            w.end("hostdiff")?;
            return Ok(());
        }

        w.start("host")?;

        // State.
        if host_a.state == host_b.state {
            if verbose {
                write_status(w, host_a)?;
            }
        } else {
            w.start("a")?;
            write_status(w, host_a)?;
            w.end("a")?;
            w.start("b")?;
            write_status(w, host_b)?;
            w.end("b")?;
        }

        // Addresses: shared ones unwrapped, one-sided ones under a/b.
        let mut common: Vec<&Address> = host_a.addresses.intersection(&host_b.addresses).collect();
        common.sort();
        for addr in common {
            write_address(w, addr)?;
        }
        let mut only_a: Vec<&Address> = host_a.addresses.difference(&host_b.addresses).collect();
        only_a.sort();
        if !only_a.is_empty() {
            w.start("a")?;
            for addr in only_a {
                write_address(w, addr)?;
            }
            w.end("a")?;
        }
        let mut only_b: Vec<&Address> = host_b.addresses.difference(&host_a.addresses).collect();
        only_b.sort();
        if !only_b.is_empty() {
            w.start("b")?;
            for addr in only_b {
                write_address(w, addr)?;
            }
            w.end("b")?;
        }

        // Host names, same shape, wrapped in a hostnames element.
        let mut common: Vec<&String> = host_a.hostnames.intersection(&host_b.hostnames).collect();
        common.sort();
        let mut names_a: Vec<&String> = host_a.hostnames.difference(&host_b.hostnames).collect();
        names_a.sort();
        let mut names_b: Vec<&String> = host_b.hostnames.difference(&host_a.hostnames).collect();
        names_b.sort();
        if !(common.is_empty() && names_a.is_empty() && names_b.is_empty()) {
            w.start("hostnames")?;
            for name in common {
                w.empty("hostname", &[("name", name)])?;
            }
            if !names_a.is_empty() {
                w.start("a")?;
                for name in names_a {
                    w.empty("hostname", &[("name", name)])?;
                }
                w.end("a")?;
            }
            if !names_b.is_empty() {
                w.start("b")?;
                for name in names_b {
                    w.empty("hostname", &[("name", name)])?;
                }
                w.end("b")?;
            }
            w.end("hostnames")?;
        }

        // Ports: extraports summaries first, then per-port diffs.
        let extraports_equal = host_a.extraports == host_b.extraports;
        let has_extraports_content = if extraports_equal {
            !host_a.extraports.is_empty()
        } else {
            true
        };
        let emitted_ports: Vec<&PortDiff> = diff
            .port_diffs
            .iter()
            .filter(|pd| pd.cost > 0 || verbose)
            .collect();
        if has_extraports_content || !emitted_ports.is_empty() {
            w.start("ports")?;
            if extraports_equal {
                write_extraports(w, host_a)?;
            } else {
                w.start("a")?;
                write_extraports(w, host_a)?;
                w.end("a")?;
                w.start("b")?;
                write_extraports(w, host_b)?;
                w.end("b")?;
            }
            for port_diff in emitted_ports {
                if port_diff.cost == 0 {
                    write_port(w, &port_diff.port_a)?;
                } else {
                    write_port_diff(w, port_diff)?;
                }
            }
            w.end("ports")?;
        }

        // OS changes.
        if (diff.os_changed || verbose) && !diff.os_ops.is_empty() {
            w.start("os")?;
            for op in &diff.os_ops {
                if matches!(op.tag, OpTag::Replace | OpTag::Delete) {
                    w.start("a")?;
                    for os in &host_a.os[op.a.clone()] {
                        w.empty("osmatch", &[("name", os)])?;
                    }
                    w.end("a")?;
                }
                if matches!(op.tag, OpTag::Replace | OpTag::Insert) {
                    w.start("b")?;
                    for os in &host_b.os[op.b.clone()] {
                        w.empty("osmatch", &[("name", os)])?;
                    }
                    w.end("b")?;
                }
                if op.tag == OpTag::Equal {
                    for os in &host_a.os[op.a.clone()] {
                        w.empty("osmatch", &[("name", os)])?;
                    }
                }
            }
            w.end("os")?;
        }

        // Host script changes.
        if !diff.script_result_diffs.is_empty() || verbose {
            write_script_section(
                w,
                "hostscript",
                &host_a.script_results,
                &host_b.script_results,
                &diff.script_result_diffs,
            )?;
        }

        w.end("host")?;
        w.end("hostdiff")?;
        Ok(())
    }
}

fn scanrun_differs(scan_a: &Scan, scan_b: &Scan) -> bool {
    scan_a.scanner != scan_b.scanner
        || scan_a.version != scan_b.version
        || scan_a.args != scan_b.args
        || scan_a.start_date != scan_b.start_date
        || scan_a.end_date != scan_b.end_date
}

fn write_scanrun<W: Write>(w: &mut XmlWriter<W>, scan: &Scan) -> Result<(), RenderError> {
    let mut attrs: Vec<(&str, String)> = Vec::new();
    if let Some(scanner) = &scan.scanner {
        attrs.push(("scanner", scanner.clone()));
    }
    if let Some(args) = &scan.args {
        attrs.push(("args", args.clone()));
    }
    if let Some(start) = &scan.start_date {
        attrs.push(("start", start.timestamp().to_string()));
        attrs.push((
            "startstr",
            start.format("%a %b %d %H:%M:%S %Y").to_string(),
        ));
    }
    if let Some(version) = &scan.version {
        attrs.push(("version", version.clone()));
    }
    w.empty("nmaprun", &attrs)
}

fn write_status<W: Write>(w: &mut XmlWriter<W>, host: &Host) -> Result<(), RenderError> {
    if let Some(state) = &host.state {
        w.empty("status", &[("state", state)])?;
    }
    Ok(())
}

fn write_address<W: Write>(w: &mut XmlWriter<W>, addr: &Address) -> Result<(), RenderError> {
    w.empty(
        "address",
        &[("addr", addr.value()), ("addrtype", addr.addr_type())],
    )
}

fn write_extraports<W: Write>(w: &mut XmlWriter<W>, host: &Host) -> Result<(), RenderError> {
    for (state, count) in &host.extraports {
        let count = count.to_string();
        w.empty("extraports", &[("state", state), ("count", &count)])?;
    }
    Ok(())
}

fn write_service<W: Write>(w: &mut XmlWriter<W>, service: &Service) -> Result<(), RenderError> {
    if service.is_empty() {
        return Ok(());
    }
    let mut attrs: Vec<(&str, &String)> = Vec::new();
    for (key, value) in [
        ("name", &service.name),
        ("product", &service.product),
        ("version", &service.version),
        ("extrainfo", &service.extrainfo),
        ("tunnel", &service.tunnel),
    ] {
        if let Some(value) = value {
            attrs.push((key, value));
        }
    }
    w.empty("service", &attrs)
}

fn write_script<W: Write>(w: &mut XmlWriter<W>, sr: &ScriptResult) -> Result<(), RenderError> {
    w.empty("script", &[("id", &sr.id), ("output", &sr.output)])
}

fn write_port<W: Write>(w: &mut XmlWriter<W>, port: &Port) -> Result<(), RenderError> {
    let portid = port.spec.number.to_string();
    w.start_with(
        "port",
        &[("portid", &portid), ("protocol", &port.spec.protocol)],
    )?;
    if let Some(state) = &port.state {
        w.empty("state", &[("state", state)])?;
    }
    write_service(w, &port.service)?;
    for sr in &port.script_results {
        write_script(w, sr)?;
    }
    w.end("port")
}

fn write_port_diff<W: Write>(w: &mut XmlWriter<W>, diff: &PortDiff) -> Result<(), RenderError> {
    w.start("portdiff")?;
    if diff.port_a.spec == diff.port_b.spec && diff.port_a.state == diff.port_b.state {
        let portid = diff.port_a.spec.number.to_string();
        w.start_with(
            "port",
            &[("portid", &portid), ("protocol", &diff.port_a.spec.protocol)],
        )?;
        if let Some(state) = &diff.port_a.state {
            w.empty("state", &[("state", state)])?;
        }
        if diff.port_a.service == diff.port_b.service {
            write_service(w, &diff.port_a.service)?;
        } else {
            w.start("a")?;
            write_service(w, &diff.port_a.service)?;
            w.end("a")?;
            w.start("b")?;
            write_service(w, &diff.port_b.service)?;
            w.end("b")?;
        }
        for sr_diff in &diff.script_result_diffs {
            write_script_diff(w, sr_diff)?;
        }
        w.end("port")?;
    } else {
        w.start("a")?;
        write_port(w, &diff.port_a)?;
        w.end("a")?;
        w.start("b")?;
        write_port(w, &diff.port_b)?;
        w.end("b")?;
    }
    w.end("portdiff")
}

fn write_script_diff<W: Write>(
    w: &mut XmlWriter<W>,
    diff: &ScriptResultDiff,
) -> Result<(), RenderError> {
    match (&diff.sr_a, &diff.sr_b) {
        (Some(a), Some(b)) if a == b => write_script(w, a),
        (sr_a, sr_b) => {
            if let Some(a) = sr_a {
                w.start("a")?;
                write_script(w, a)?;
                w.end("a")?;
            }
            if let Some(b) = sr_b {
                w.start("b")?;
                write_script(w, b)?;
                w.end("b")?;
            }
            Ok(())
        }
    }
}

/// Whole-section script diffs: absent on one side wraps the entire section
/// element in `<a>`/`<b>`, otherwise the section carries per-script diffs.
fn write_script_section<W: Write>(
    w: &mut XmlWriter<W>,
    elem_name: &str,
    results_a: &[ScriptResult],
    results_b: &[ScriptResult],
    diffs: &[ScriptResultDiff],
) -> Result<(), RenderError> {
    if results_a.is_empty() && results_b.is_empty() {
        return Ok(());
    }
    if results_b.is_empty() {
        w.start("a")?;
        w.start(elem_name)?;
        for sr in results_a {
            write_script(w, sr)?;
        }
        w.end(elem_name)?;
        w.end("a")
    } else if results_a.is_empty() {
        w.start("b")?;
        w.start(elem_name)?;
        for sr in results_b {
            write_script(w, sr)?;
        }
        w.end(elem_name)?;
        w.end("b")
    } else {
        w.start(elem_name)?;
        for diff in diffs {
            write_script_diff(w, diff)?;
        }
        w.end(elem_name)
    }
}

fn write_host<W: Write>(w: &mut XmlWriter<W>, host: &Host) -> Result<(), RenderError> {
    w.start("host")?;
    write_status(w, host)?;
    for addr in &host.addresses {
        write_address(w, addr)?;
    }
    if !host.hostnames.is_empty() {
        w.start("hostnames")?;
        for name in &host.hostnames {
            w.empty("hostname", &[("name", name)])?;
        }
        w.end("hostnames")?;
    }

    let mut visible: Vec<&Port> = host
        .ports
        .values()
        .filter(|port| !host.is_extraports(port.state.as_deref()))
        .collect();
    visible.sort_by(|x, y| x.spec.cmp(&y.spec));
    if !host.extraports.is_empty() || !visible.is_empty() {
        w.start("ports")?;
        write_extraports(w, host)?;
        for port in visible {
            write_port(w, port)?;
        }
        w.end("ports")?;
    }

    if !host.os.is_empty() {
        w.start("os")?;
        for os in &host.os {
            w.empty("osmatch", &[("name", os)])?;
        }
        w.end("os")?;
    }

    if !host.script_results.is_empty() {
        w.start("hostscript")?;
        for sr in &host.script_results {
            write_script(w, sr)?;
        }
        w.end("hostscript")?;
    }

    w.end("host")
}

/// Thin wrapper over the quick-xml event writer that smooths the error type
/// into [`RenderError`] and keeps element emission to one-liners.
struct XmlWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    fn new(out: W) -> Self {
        Self {
            inner: Writer::new_with_indent(out, b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.inner
            .write_event(event)
            .map_err(|e| RenderError::Xml(e.to_string()))
    }

    fn decl(&mut self) -> Result<(), RenderError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
    }

    fn start(&mut self, name: &str) -> Result<(), RenderError> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn start_with<V: AsRef<str>>(
        &mut self,
        name: &str,
        attrs: &[(&str, V)],
    ) -> Result<(), RenderError> {
        let mut elem = BytesStart::new(name);
        for (key, value) in attrs {
            elem.push_attribute((*key, value.as_ref()));
        }
        self.write(Event::Start(elem))
    }

    fn empty<V: AsRef<str>>(&mut self, name: &str, attrs: &[(&str, V)]) -> Result<(), RenderError> {
        let mut elem = BytesStart::new(name);
        for (key, value) in attrs {
            elem.push_attribute((*key, value.as_ref()));
        }
        self.write(Event::Empty(elem))
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.write(Event::End(BytesEnd::new(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::PortSpec;

    fn render_to_string(scan_a: &Scan, scan_b: &Scan, verbose: bool) -> String {
        let options = DiffOptions { verbose };
        let diff = DiffEngine::new(options).diff(scan_a, scan_b);
        let mut buf = Vec::new();
        XmlRenderer::new(options)
            .render(scan_a, scan_b, &diff, &mut buf)
            .expect("xml rendering failed");
        String::from_utf8(buf).expect("xml output is UTF-8")
    }

    fn scan_with_port(state: &str) -> Scan {
        let mut scan = Scan::new();
        let mut host = Host::new();
        host.state = Some("up".to_string());
        host.add_address(Address::IPv4("10.0.0.1".to_string()));
        let mut port = Port::new(PortSpec::new(80, "tcp"));
        port.state = Some(state.to_string());
        host.add_port(port);
        scan.hosts.push(host);
        scan
    }

    #[test]
    fn test_document_envelope() {
        let scan = scan_with_port("open");
        let output = render_to_string(&scan, &scan, false);

        assert!(output.contains(r#"<nmapdiff version="1">"#));
        assert!(output.contains("<scandiff>"));
        assert!(output.contains("</nmapdiff>"));
        // no differences, nothing inside
        assert!(!output.contains("<hostdiff>"));
    }

    #[test]
    fn test_port_state_change_wrapped_in_a_b() {
        let scan_a = scan_with_port("open");
        let scan_b = scan_with_port("closed");
        let output = render_to_string(&scan_a, &scan_b, false);

        assert!(output.contains("<hostdiff>"));
        assert!(output.contains("<portdiff>"));
        assert!(output.contains(r#"<state state="open"/>"#));
        assert!(output.contains(r#"<state state="closed"/>"#));
        assert!(output.contains("<a>"));
        assert!(output.contains("<b>"));
    }

    #[test]
    fn test_removed_host_emitted_wholesale() {
        let scan_a = scan_with_port("open");
        let scan_b = Scan::new();
        let output = render_to_string(&scan_a, &scan_b, false);

        assert!(output.contains("<hostdiff>"));
        assert!(output.contains("<a>"));
        assert!(!output.contains("<b>"));
        assert!(output.contains(r#"<address addr="10.0.0.1" addrtype="ipv4"/>"#));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut scan_a = Scan::new();
        scan_a
            .pre_script_results
            .push(ScriptResult::new("banner", "a <b> & \"c\""));
        let scan_b = Scan::new();
        let output = render_to_string(&scan_a, &scan_b, false);

        assert!(output.contains("&lt;b&gt;"));
        assert!(output.contains("&amp;"));
        assert!(!output.contains("<b> &"));
    }

    #[test]
    fn test_verbose_emits_unchanged_structure_unwrapped() {
        let scan = scan_with_port("open");
        let output = render_to_string(&scan, &scan, true);

        assert!(output.contains("<hostdiff>"));
        assert!(output.contains(r#"<status state="up"/>"#));
        assert!(!output.contains("<a>"));
        assert!(!output.contains("<b>"));
    }
}
