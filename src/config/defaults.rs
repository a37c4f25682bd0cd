//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Serialize};

use crate::domain::isolation::{
    MatchKind, ModuleGroup, DEFAULT_PLATFORM_PREFIX, DEFAULT_SHARED_MARKER,
};
use crate::manifest::DuplicatePolicy;
use crate::paths::MANIFEST_PATTERN;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_pattern, String, MANIFEST_PATTERN.to_string());
default_fn!(
    default_exclude,
    Vec<String>,
    vec!["**/Library/**".to_string(), "**/Temp/**".to_string()]
);
default_fn!(default_shared_marker, String, DEFAULT_SHARED_MARKER.to_string());
default_fn!(default_platform_prefix, String, DEFAULT_PLATFORM_PREFIX.to_string());

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Manifest discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ManifestsConfig {
    /// Glob pattern relative to the root (default: `**/*.asmdef`)
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Root-relative globs to ignore (default: Library and Temp folders)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Duplicate module name handling (default: warn)
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            exclude: default_exclude(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

/// A configured classification rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    #[serde(default, rename = "match")]
    pub kind: MatchKind,
    pub pattern: String,
    pub group: ModuleGroup,
}

/// Isolation policy settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Substring marking shared modules (default: `Shared`)
    #[serde(default = "default_shared_marker")]
    pub shared_marker: String,
    /// Substring marking platform modules (default: `Unity.`)
    #[serde(default = "default_platform_prefix")]
    pub platform_prefix: String,
    /// Explicit rule table. When non-empty it replaces the two markers above.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            shared_marker: default_shared_marker(),
            platform_prefix: default_platform_prefix(),
            rules: Vec::new(),
        }
    }
}
