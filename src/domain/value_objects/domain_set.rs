//! Domain Set value object
//!
//! The ordered, de-duplicated list of hostnames a certificate must cover.
//! The primary domain is always first and can never be dropped; only the
//! trailing aliases are removed by fallbacks.

use std::fmt;

use thiserror::Error;

/// Maximum length of a fully qualified hostname (RFC 1035)
const MAX_HOSTNAME_LEN: usize = 253;
/// Maximum length of a single label
const MAX_LABEL_LEN: usize = 63;

/// Hostname validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("hostname is empty")]
    Empty,

    #[error("hostname '{0}' is longer than 253 characters")]
    TooLong(String),

    #[error("hostname '{0}' must contain at least one dot")]
    NotQualified(String),

    #[error("hostname '{host}' has an invalid label '{label}'")]
    InvalidLabel { host: String, label: String },
}

/// Normalize and validate a single hostname.
///
/// Trims whitespace, lower-cases, and strips one trailing dot.
pub fn normalize_hostname(raw: &str) -> Result<String, DomainError> {
    let host = raw.trim().trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return Err(DomainError::Empty);
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(DomainError::TooLong(host));
    }
    if !host.contains('.') {
        return Err(DomainError::NotQualified(host));
    }

    for label in host.split('.') {
        if !is_valid_label(label) {
            return Err(DomainError::InvalidLabel {
                label: label.to_string(),
                host: host.clone(),
            });
        }
    }

    Ok(host)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Ordered set of hostnames, primary first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSet {
    hosts: Vec<String>,
}

impl DomainSet {
    /// Build a set from a primary domain and its aliases.
    ///
    /// Aliases equal to the primary, or repeated, are dropped.
    pub fn new<I, S>(primary: &str, aliases: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts = vec![normalize_hostname(primary)?];
        for alias in aliases {
            let alias = normalize_hostname(alias.as_ref())?;
            if !hosts.contains(&alias) {
                hosts.push(alias);
            }
        }
        Ok(Self { hosts })
    }

    /// The primary domain
    pub fn primary(&self) -> &str {
        &self.hosts[0]
    }

    /// Aliases in their configured order
    pub fn aliases(&self) -> &[String] {
        &self.hosts[1..]
    }

    pub fn has_aliases(&self) -> bool {
        self.hosts.len() > 1
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Always false: the primary is mandatory
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }

    /// Reduced set containing only the primary domain
    pub fn primary_only(&self) -> Self {
        Self {
            hosts: vec![self.hosts[0].clone()],
        }
    }

    /// Keep the primary plus the aliases present in `covered`.
    ///
    /// Entries of `covered` that are not part of this set are ignored, and
    /// the primary is kept even when `covered` does not mention it.
    pub fn restricted_to<S: AsRef<str>>(&self, covered: &[S]) -> Self {
        let covered: Vec<String> = covered
            .iter()
            .filter_map(|c| normalize_hostname(c.as_ref()).ok())
            .collect();

        let mut hosts = vec![self.hosts[0].clone()];
        hosts.extend(
            self.aliases()
                .iter()
                .filter(|alias| covered.contains(alias))
                .cloned(),
        );
        Self { hosts }
    }

    /// Whether every alias of `self` is also present in `other`
    pub fn aliases_covered_by(&self, other: &DomainSet) -> bool {
        self.aliases().iter().all(|alias| other.contains(alias))
    }

    /// Space-separated list, as used by `server_name` directives
    pub fn server_names(&self) -> String {
        self.hosts.join(" ")
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.hosts.clone()
    }
}

impl fmt::Display for DomainSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hosts.join(", "))
    }
}
