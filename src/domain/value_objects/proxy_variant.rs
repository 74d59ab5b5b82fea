//! Proxy configuration variant
//!
//! - `Plain`: port 80 only, used until a certificate exists
//! - `Secured`: ports 80 and 443, used once a certificate exists

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyVariant {
    Plain,
    Secured,
}

impl ProxyVariant {
    /// Pure selection from certificate presence
    pub fn for_certificate(present: bool) -> Self {
        if present {
            ProxyVariant::Secured
        } else {
            ProxyVariant::Plain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyVariant::Plain => "plain",
            ProxyVariant::Secured => "secured",
        }
    }

    /// URL scheme served by this variant
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyVariant::Plain => "http",
            ProxyVariant::Secured => "https",
        }
    }
}

impl std::fmt::Display for ProxyVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
