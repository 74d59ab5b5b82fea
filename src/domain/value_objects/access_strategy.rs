//! Access strategy value object - how container runtime commands are invoked
//!
//! - `Direct`: the current user can talk to the runtime
//! - `GroupSwitch`: run under the runtime's group without a new login session
//! - `Elevated`: run with explicit privilege elevation

use serde::{Deserialize, Serialize};

/// Strategy used to reach the container runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessStrategy {
    Direct,
    GroupSwitch,
    Elevated,
}

impl AccessStrategy {
    /// Probe order, most preferred first
    pub const PROBE_ORDER: [AccessStrategy; 3] = [
        AccessStrategy::Direct,
        AccessStrategy::GroupSwitch,
        AccessStrategy::Elevated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStrategy::Direct => "direct",
            AccessStrategy::GroupSwitch => "group-switch",
            AccessStrategy::Elevated => "elevated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "direct" => Some(AccessStrategy::Direct),
            "group-switch" | "group_switch" | "groupswitch" | "sg" => {
                Some(AccessStrategy::GroupSwitch)
            }
            "elevated" | "sudo" => Some(AccessStrategy::Elevated),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccessStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured strategy selection: probe all, or pin one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategySelection {
    #[default]
    Auto,
    Direct,
    GroupSwitch,
    Elevated,
}

impl StrategySelection {
    pub const VALID_VALUES: &'static [&'static str] =
        &["auto", "direct", "group-switch", "elevated"];

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("auto") {
            return Some(StrategySelection::Auto);
        }
        AccessStrategy::parse(value).map(Self::from)
    }

    /// Strategies to probe, in order
    pub fn candidates(&self) -> Vec<AccessStrategy> {
        match self {
            StrategySelection::Auto => AccessStrategy::PROBE_ORDER.to_vec(),
            StrategySelection::Direct => vec![AccessStrategy::Direct],
            StrategySelection::GroupSwitch => vec![AccessStrategy::GroupSwitch],
            StrategySelection::Elevated => vec![AccessStrategy::Elevated],
        }
    }
}

impl From<AccessStrategy> for StrategySelection {
    fn from(strategy: AccessStrategy) -> Self {
        match strategy {
            AccessStrategy::Direct => StrategySelection::Direct,
            AccessStrategy::GroupSwitch => StrategySelection::GroupSwitch,
            AccessStrategy::Elevated => StrategySelection::Elevated,
        }
    }
}
