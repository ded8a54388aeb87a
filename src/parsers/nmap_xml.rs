//! Streaming Nmap XML reader.

use std::borrow::Cow;

use chrono::{DateTime, Local, TimeZone};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ParseErrorKind, Result, ScanDiffError};
use crate::model::{Address, Host, Port, PortSpec, Scan, ScriptResult, Service};

/// A successfully parsed scan plus the non-fatal warnings recorded along
/// the way.
#[derive(Debug)]
pub struct ParsedScan {
    pub scan: Scan,
    pub warnings: Vec<String>,
}

/// Streaming parser for Nmap XML scan reports.
///
/// The reader walks start/end events with an element stack, mirroring the
/// report structure: `nmaprun` > `host` > `ports` > `port` and so on.
/// Script results are sorted by id once their container closes, which is
/// the order the diff aligners rely on.
pub struct ScanParser {
    scan: Scan,
    element_stack: Vec<String>,
    current_host: Option<Host>,
    current_port: Option<Port>,
    warnings: Vec<String>,
}

impl ScanParser {
    pub fn new() -> Self {
        Self {
            scan: Scan::new(),
            element_stack: Vec::new(),
            current_host: None,
            current_port: None,
            warnings: Vec::new(),
        }
    }

    /// Parse a complete document.
    pub fn parse(mut self, content: &str) -> Result<ParsedScan> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = element_name(&e);
                    self.handle_start(&name, &e);
                    self.element_stack.push(name);
                }
                Ok(Event::Empty(e)) => {
                    let name = element_name(&e);
                    self.handle_start(&name, &e);
                    self.handle_end(&name);
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.element_stack.pop();
                    self.handle_end(&name);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ScanDiffError::parse(
                        format!("at byte {}", reader.buffer_position()),
                        ParseErrorKind::InvalidXml(e.to_string()),
                    ))
                }
            }
            buf.clear();
        }

        self.scan.pre_script_results.sort();
        self.scan.post_script_results.sort();
        Ok(ParsedScan {
            scan: self.scan,
            warnings: self.warnings,
        })
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    fn parent_element(&self) -> Option<&str> {
        self.element_stack.last().map(String::as_str)
    }

    fn current_host_name(&self) -> String {
        self.current_host
            .as_ref()
            .map(Host::format_name)
            .unwrap_or_else(|| "<no name>".to_string())
    }

    fn handle_start(&mut self, name: &str, e: &BytesStart<'_>) {
        match name {
            "nmaprun" => self.start_nmaprun(e),
            "host" => {
                if self.parent_element() == Some("nmaprun") {
                    self.current_host = Some(Host::new());
                }
            }
            "status" => self.start_status(e),
            "address" => self.start_address(e),
            "hostname" => self.start_hostname(e),
            "extraports" => self.start_extraports(e),
            "port" => self.start_port(e),
            "state" => self.start_state(e),
            "service" => self.start_service(e),
            "script" => self.start_script(e),
            "osmatch" => self.start_osmatch(e),
            "finished" => self.start_finished(e),
            _ => {}
        }
    }

    fn handle_end(&mut self, name: &str) {
        match name {
            "host" => {
                if let Some(mut host) = self.current_host.take() {
                    host.script_results.sort();
                    self.scan.hosts.push(host);
                }
            }
            "port" => {
                if let Some(mut port) = self.current_port.take() {
                    port.script_results.sort();
                    if let Some(host) = self.current_host.as_mut() {
                        host.add_port(port);
                    }
                }
            }
            _ => {}
        }
    }

    fn start_nmaprun(&mut self, e: &BytesStart<'_>) {
        self.scan.scanner = attr_of(e, "scanner");
        self.scan.args = attr_of(e, "args");
        self.scan.version = attr_of(e, "version");
        if let Some(start) = attr_of(e, "start") {
            match self.parse_timestamp(&start) {
                Some(date) => self.scan.start_date = Some(date),
                None => self.warn(format!(
                    "Can't convert start time \"{start}\" to a date; ignoring."
                )),
            }
        }
    }

    fn start_status(&mut self, e: &BytesStart<'_>) {
        if self.current_host.is_none() {
            return;
        }
        match attr_of(e, "state") {
            Some(state) => {
                if let Some(host) = self.current_host.as_mut() {
                    host.state = Some(state);
                }
            }
            None => self.warn(format!(
                "status element of host {} is missing the \"state\" attribute; \
                 assuming unknown.",
                self.current_host_name()
            )),
        }
    }

    fn start_address(&mut self, e: &BytesStart<'_>) {
        if self.current_host.is_none() {
            return;
        }
        let Some(addr) = attr_of(e, "addr") else {
            self.warn(format!(
                "address element of host {} is missing the \"addr\" attribute; skipping.",
                self.current_host_name()
            ));
            return;
        };
        let addr_type = attr_of(e, "addrtype").unwrap_or_else(|| "ipv4".to_string());
        match Address::from_parts(&addr_type, addr) {
            Some(address) => {
                if let Some(host) = self.current_host.as_mut() {
                    host.add_address(address);
                }
            }
            None => self.warn(format!(
                "Unknown address type \"{addr_type}\" in host {}; skipping.",
                self.current_host_name()
            )),
        }
    }

    fn start_hostname(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("hostnames") || self.current_host.is_none() {
            return;
        }
        match attr_of(e, "name") {
            Some(name) => {
                if let Some(host) = self.current_host.as_mut() {
                    host.add_hostname(name);
                }
            }
            None => self.warn(format!(
                "hostname element of host {} is missing the \"name\" attribute; skipping.",
                self.current_host_name()
            )),
        }
    }

    fn start_extraports(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("ports") || self.current_host.is_none() {
            return;
        }
        let state = match attr_of(e, "state") {
            Some(state) => state,
            None => {
                self.warn(format!(
                    "extraports element of host {} is missing the \"state\" attribute; \
                     assuming \"unknown\".",
                    self.current_host_name()
                ));
                "unknown".to_string()
            }
        };
        if self
            .current_host
            .as_ref()
            .is_some_and(|h| h.extraports.contains_key(&state))
        {
            self.warn(format!(
                "Duplicate extraports state \"{state}\" in host {}.",
                self.current_host_name()
            ));
        }

        let count = match attr_of(e, "count") {
            None => {
                self.warn(format!(
                    "extraports element of host {} is missing the \"count\" attribute; \
                     assuming 0.",
                    self.current_host_name()
                ));
                0
            }
            Some(raw) => match raw.parse::<u64>() {
                Ok(count) => count,
                Err(_) => {
                    self.warn(format!(
                        "Can't convert extraports count \"{raw}\" to an integer in host {}; \
                         assuming 0.",
                        self.current_host_name()
                    ));
                    0
                }
            },
        };
        if let Some(host) = self.current_host.as_mut() {
            host.extraports.insert(state, count);
        }
    }

    fn start_port(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("ports") || self.current_host.is_none() {
            return;
        }
        let Some(portid_str) = attr_of(e, "portid") else {
            self.warn(format!(
                "port element of host {} missing the \"portid\" attribute; skipping.",
                self.current_host_name()
            ));
            return;
        };
        let Ok(number) = portid_str.parse::<u16>() else {
            self.warn(format!(
                "Can't convert portid \"{portid_str}\" to a port number in host {}; \
                 skipping port.",
                self.current_host_name()
            ));
            return;
        };
        let Some(protocol) = attr_of(e, "protocol") else {
            self.warn(format!(
                "port element of host {} missing the \"protocol\" attribute; skipping.",
                self.current_host_name()
            ));
            return;
        };
        self.current_port = Some(Port::new(PortSpec::new(number, protocol)));
    }

    fn start_state(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("port") {
            return;
        }
        let Some(port) = self.current_port.as_mut() else {
            return;
        };
        match attr_of(e, "state") {
            Some(state) => port.state = Some(state),
            None => {
                let spec = port.spec.to_string();
                self.warn(format!(
                    "state element of port {spec} is missing the \"state\" attribute; \
                     assuming unknown."
                ));
            }
        }
    }

    fn start_service(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("port") {
            return;
        }
        if let Some(port) = self.current_port.as_mut() {
            port.service = Service {
                name: attr_of(e, "name"),
                product: attr_of(e, "product"),
                version: attr_of(e, "version"),
                extrainfo: attr_of(e, "extrainfo"),
                tunnel: attr_of(e, "tunnel"),
            };
        }
    }

    fn start_script(&mut self, e: &BytesStart<'_>) {
        let Some(id) = attr_of(e, "id") else {
            self.warn("script element missing the \"id\" attribute; skipping.".to_string());
            return;
        };
        let Some(output) = attr_of(e, "output") else {
            self.warn("script element missing the \"output\" attribute; skipping.".to_string());
            return;
        };
        let result = ScriptResult::new(id, output);

        match self.parent_element() {
            Some("prescript") => self.scan.pre_script_results.push(result),
            Some("postscript") => self.scan.post_script_results.push(result),
            Some("hostscript") => {
                if let Some(host) = self.current_host.as_mut() {
                    host.script_results.push(result);
                }
            }
            Some("port") => {
                if let Some(port) = self.current_port.as_mut() {
                    port.script_results.push(result);
                }
            }
            _ => self.warn(
                "script element not inside prescript, postscript, hostscript, or port \
                 element; ignoring."
                    .to_string(),
            ),
        }
    }

    fn start_osmatch(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("os") || self.current_host.is_none() {
            return;
        }
        match attr_of(e, "name") {
            Some(name) => {
                if let Some(host) = self.current_host.as_mut() {
                    host.os.push(name);
                }
            }
            None => self.warn(format!(
                "osmatch element of host {} is missing the \"name\" attribute; skipping.",
                self.current_host_name()
            )),
        }
    }

    fn start_finished(&mut self, e: &BytesStart<'_>) {
        if self.parent_element() != Some("runstats") {
            return;
        }
        if let Some(time) = attr_of(e, "time") {
            match self.parse_timestamp(&time) {
                Some(date) => self.scan.end_date = Some(date),
                None => self.warn(format!(
                    "Can't convert end time \"{time}\" to a date; ignoring."
                )),
            }
        }
    }

    fn parse_timestamp(&self, raw: &str) -> Option<DateTime<Local>> {
        let epoch = raw.parse::<i64>().ok()?;
        Local.timestamp_opt(epoch, 0).single()
    }
}

impl Default for ScanParser {
    fn default() -> Self {
        Self::new()
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attr_of(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .filter_map(std::result::Result::ok)
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HostId;

    const FULL_SCAN: &str = r#"<?xml version="1.0"?>
<nmaprun scanner="nmap" args="nmap -A -T4 scanme.example.com" start="1717236000" version="7.95">
<prescript>
<script id="broadcast-ping" output="no responses"/>
</prescript>
<host>
<status state="up"/>
<address addr="10.0.0.1" addrtype="ipv4"/>
<address addr="00:11:22:33:44:55" addrtype="mac"/>
<hostnames>
<hostname name="scanme.example.com"/>
</hostnames>
<ports>
<extraports state="filtered" count="997"/>
<port portid="22" protocol="tcp"><state state="open"/>
<service name="ssh" product="OpenSSH" version="9.6"/>
<script id="ssh-hostkey" output="2048 aa:bb (RSA)"/>
</port>
<port portid="80" protocol="tcp"><state state="open"/>
<service name="http"/>
</port>
</ports>
<os>
<osmatch name="Linux 5.4"/>
<osmatch name="Linux 5.10"/>
</os>
<hostscript>
<script id="smb-os-discovery" output="Unix"/>
</hostscript>
</host>
<runstats><finished time="1717236123"/></runstats>
</nmaprun>"#;

    #[test]
    fn test_parse_full_scan() {
        let parsed = ScanParser::new().parse(FULL_SCAN).expect("parse scan");
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

        let scan = parsed.scan;
        assert_eq!(scan.scanner.as_deref(), Some("nmap"));
        assert_eq!(scan.version.as_deref(), Some("7.95"));
        assert!(scan.start_date.is_some());
        assert!(scan.end_date.is_some());
        assert_eq!(scan.pre_script_results.len(), 1);

        assert_eq!(scan.hosts.len(), 1);
        let host = &scan.hosts[0];
        assert_eq!(host.state.as_deref(), Some("up"));
        assert_eq!(host.addresses.len(), 2);
        assert_eq!(
            host.id(),
            HostId::Address(Address::IPv4("10.0.0.1".to_string()))
        );
        assert_eq!(host.hostnames.len(), 1);
        assert_eq!(host.extraports.get("filtered"), Some(&997));
        assert_eq!(host.ports.len(), 2);
        assert_eq!(host.os, vec!["Linux 5.4", "Linux 5.10"]);
        assert_eq!(host.script_results.len(), 1);

        let ssh = &host.ports[&PortSpec::new(22, "tcp")];
        assert_eq!(ssh.state.as_deref(), Some("open"));
        assert_eq!(ssh.service.name.as_deref(), Some("ssh"));
        assert_eq!(ssh.service.product.as_deref(), Some("OpenSSH"));
        assert_eq!(ssh.script_results.len(), 1);
    }

    #[test]
    fn test_malformed_attributes_warn_but_do_not_abort() {
        let content = r#"<nmaprun scanner="nmap">
<host>
<status/>
<address addrtype="ipv4"/>
<address addr="10.9.9.9" addrtype="ipx"/>
<ports>
<extraports state="closed" count="many"/>
<port portid="eighty" protocol="tcp"><state state="open"/></port>
<port portid="81" protocol="tcp"><state state="open"/></port>
</ports>
</host>
</nmaprun>"#;

        let parsed = ScanParser::new().parse(content).expect("tolerant parse");
        assert_eq!(parsed.warnings.len(), 5, "{:?}", parsed.warnings);

        let host = &parsed.scan.hosts[0];
        assert!(host.state.is_none());
        assert!(host.addresses.is_empty());
        assert_eq!(host.extraports.get("closed"), Some(&0));
        assert_eq!(host.ports.len(), 1);
        assert!(host.ports.contains_key(&PortSpec::new(81, "tcp")));
    }

    #[test]
    fn test_malformed_xml_is_fatal() {
        let err = ScanParser::new()
            .parse("<nmaprun><host></nmaprun>")
            .unwrap_err();
        assert!(matches!(err, ScanDiffError::Parse { .. }));
    }

    #[test]
    fn test_script_results_sorted_by_id() {
        let content = r#"<nmaprun>
<host>
<status state="up"/>
<hostscript>
<script id="zeta" output="z"/>
<script id="alpha" output="a"/>
</hostscript>
</host>
</nmaprun>"#;

        let parsed = ScanParser::new().parse(content).expect("parse");
        let ids: Vec<&str> = parsed.scan.hosts[0]
            .script_results
            .iter()
            .map(|sr| sr.id.as_str())
            .collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
