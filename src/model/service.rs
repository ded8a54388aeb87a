//! Service detection results for a port.

/// A service version as determined by a version-detection scan, or just the
/// looked-up port name when version detection was not used.
///
/// Equality deliberately ignores `tunnel`: a service that merely gained or
/// lost an ssl wrapper string is still "the same service" for costing
/// purposes, and the tunnel is folded into the displayed name instead.
#[derive(Debug, Clone, Default)]
pub struct Service {
    pub name: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub extrainfo: Option<String>,
    pub tunnel: Option<String>,
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.product == other.product
            && self.version == other.version
            && self.extrainfo == other.extrainfo
    }
}

impl Eq for Service {}

impl Service {
    /// The SERVICE column string: tunnel and name joined by "/".
    pub fn name_string(&self) -> Option<String> {
        let parts: Vec<&str> = [self.tunnel.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// The VERSION column string: product, version and "(extrainfo)" joined
    /// by spaces.
    pub fn version_string(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(product) = &self.product {
            parts.push(product.clone());
        }
        if let Some(version) = &self.version {
            parts.push(version.clone());
        }
        if let Some(extrainfo) = &self.extrainfo {
            parts.push(format!("({extrainfo})"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// True when no attribute is set at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.product.is_none()
            && self.version.is_none()
            && self.extrainfo.is_none()
            && self.tunnel.is_none()
    }
}
