//! Colours and icons shared by every berth view.

use crossterm::style::Color;

pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    /// Warnings and in-flight steps
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    /// No-op steps and labels
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const SKIPPED: &str = "○";
    pub const DEPLOY: &str = "📦";
}

/// Fallbacks for terminals without a UTF-8 locale
pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const SKIPPED: &str = "[--]";
    pub const DEPLOY: &str = "[DEPLOY]";
}
