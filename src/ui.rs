//! Centralized UI formatting and color utilities
//!
//! This module provides a unified interface for verdict colors, icons, and
//! formatting patterns used throughout the asmguard CLI.

use colored::{ColoredString, Colorize};

use crate::domain::isolation::ModuleGroup;
use crate::validation::{Severity, Verdict};

/// Check if quiet mode is enabled via environment variable or --quiet flag
pub fn is_quiet() -> bool {
    std::env::var("ASMGUARD_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Returns a colored icon for the given verdict.
///
/// Icons:
/// - Pass: ✓ (green)
/// - Fail: ✗ (red)
pub fn verdict_icon(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Pass => "✓".green(),
        Verdict::Fail => "✗".red(),
    }
}

/// Returns a colored icon for the given issue severity.
pub fn severity_icon(severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => "ℹ".blue(),
        Severity::Warning => "⚠".yellow(),
        Severity::Error => "✗".red(),
    }
}

/// Returns a colored label for a module group.
pub fn group_label(group: ModuleGroup) -> ColoredString {
    match group {
        ModuleGroup::Shared => "shared".cyan(),
        ModuleGroup::Platform => "platform".dimmed(),
        ModuleGroup::Feature => "feature".normal(),
    }
}

/// Common text formatting patterns
pub mod format {
    /// Pluralize a noun for a count: `1 error`, `2 errors`
    pub fn count(n: usize, singular: &str, plural: &str) -> String {
        if n == 1 {
            format!("{} {}", n, singular)
        } else {
            format!("{} {}", n, plural)
        }
    }

    /// Format a separator line for sections
    pub fn separator(width: usize) -> String {
        "━".repeat(width)
    }
}
