//! What the attached terminal can render.
//!
//! berth usually runs over SSH or from a CI job, so the decision is driven
//! by environment variables as much as by the stdout handle.

use is_terminal::IsTerminal;

/// Variables set by common CI runners
const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "JENKINS_HOME",
    "BUILDKITE",
    "CIRCLECI",
];

/// Locale variables in precedence order
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_CTYPE", "LANG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub supports_color: bool,
    pub supports_unicode: bool,
    pub is_ci: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        Self::from_env(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
    }

    fn from_env(lookup: impl Fn(&str) -> Option<String>, stdout_is_tty: bool) -> Self {
        let dumb = lookup("TERM").is_some_and(|t| t.eq_ignore_ascii_case("dumb"));

        Self {
            supports_color: stdout_is_tty && !dumb && lookup("NO_COLOR").is_none(),
            supports_unicode: !dumb && locale_is_unicode(&lookup),
            is_ci: CI_MARKERS.iter().any(|key| lookup(key).is_some()),
        }
    }
}

/// The first locale variable that is set decides; none set counts as UTF-8
fn locale_is_unicode(lookup: &impl Fn(&str) -> Option<String>) -> bool {
    let Some(locale) = LOCALE_VARS.iter().find_map(|key| lookup(key)) else {
        return true;
    };
    let locale = locale.to_lowercase();
    if locale == "c" || locale == "posix" {
        return false;
    }
    locale.contains("utf-8") || locale.contains("utf8") || !locale.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn caps(env: &[(&str, &str)], stdout_is_tty: bool) -> TerminalCapabilities {
        let vars: HashMap<&str, &str> = env.iter().copied().collect();
        TerminalCapabilities::from_env(|k| vars.get(k).map(|v| v.to_string()), stdout_is_tty)
    }

    #[test]
    fn no_color_disables_color() {
        let c = caps(&[("NO_COLOR", "1"), ("TERM", "xterm-256color")], true);
        assert!(!c.supports_color);
    }

    #[test]
    fn piped_output_has_no_color() {
        assert!(!caps(&[("TERM", "xterm-256color")], false).supports_color);
    }

    #[test]
    fn ci_environment_detected() {
        assert!(caps(&[("GITHUB_ACTIONS", "true")], true).is_ci);
    }

    #[test]
    fn c_locale_falls_back_to_ascii() {
        assert!(!caps(&[("LANG", "C"), ("TERM", "xterm")], true).supports_unicode);
    }

    #[test]
    fn lc_all_wins_over_lang() {
        let c = caps(&[("LC_ALL", "en_US.UTF-8"), ("LANG", "C")], true);
        assert!(c.supports_unicode);
    }

    #[test]
    fn non_utf8_codeset_falls_back_to_ascii() {
        assert!(!caps(&[("LANG", "en_US.ISO-8859-1")], true).supports_unicode);
    }

    #[test]
    fn dumb_terminal_disables_enhancements() {
        let c = caps(&[("TERM", "dumb")], true);
        assert!(!c.supports_color);
        assert!(!c.supports_unicode);
    }
}
