//! Differ Domain Service
//!
//! Summarizes how a rendered proxy configuration differs from the installed
//! one, for progress output and debug logs. The change decision itself is a
//! byte comparison made by the caller.

use similar::{ChangeTag, TextDiff};

/// Line-level summary of a configuration change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    /// Number of lines added
    pub additions: usize,
    /// Number of lines deleted
    pub deletions: usize,
    /// Unified diff text (empty when unchanged)
    pub unified: String,
}

impl ConfigDiff {
    pub fn has_changes(&self) -> bool {
        self.additions > 0 || self.deletions > 0
    }

    /// Compact summary (e.g., "+5, -3")
    pub fn summary(&self) -> String {
        format!("+{}, -{}", self.additions, self.deletions)
    }
}

/// Differ service for computing configuration differences
#[derive(Debug, Clone, Copy, Default)]
pub struct Differ;

impl Differ {
    pub fn new() -> Self {
        Self
    }

    /// Diff `old` (installed, possibly absent) against `new` (rendered)
    pub fn diff(&self, old: Option<&str>, new: &str, label: &str) -> ConfigDiff {
        let old = old.unwrap_or("");
        let text_diff = TextDiff::from_lines(old, new);

        let mut result = ConfigDiff::default();
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => result.deletions += 1,
                ChangeTag::Insert => result.additions += 1,
                ChangeTag::Equal => {}
            }
        }

        if result.has_changes() {
            result.unified = text_diff
                .unified_diff()
                .context_radius(2)
                .header(&format!("installed/{label}"), &format!("rendered/{label}"))
                .to_string();
        }
        result
    }
}
