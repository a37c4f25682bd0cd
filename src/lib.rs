//! # asmguard - Assembly dependency validation
//!
//! asmguard checks a Unity project's assembly definitions (`.asmdef` files)
//! for architectural problems and reports a pass/fail verdict suitable for
//! gating CI.
//!
//! ## Overview
//!
//! Every manifest declares a module name and the modules it references. The
//! manifests are assembled into a dependency graph (references to unknown
//! modules are dropped), the graph is searched for a dependency cycle, and a
//! namespace-isolation policy is enforced: "shared" modules must never depend
//! on "feature" modules.
//!
//! ## Modules
//!
//! - [`manifest`] - Manifest parsing, discovery, and the per-run manifest set
//! - [`domain`] - Graph builder, cycle detector, and isolation checker
//! - [`validation`] - Validation driver and report
//! - [`config`] - Configuration loading and merging
//! - [`formatters`] - Text and JSON rendering of reports
//!
//! ## Example
//!
//! ```
//! use asmguard::domain::isolation::NamingConvention;
//! use asmguard::manifest::{Manifest, ManifestSet};
//! use asmguard::validation::validate;
//!
//! let manifests = ManifestSet::from_manifests([
//!     Manifest::new("SharedCore", ["FeatureLogin"]),
//!     Manifest::new("FeatureLogin", Vec::<String>::new()),
//! ])?;
//!
//! let report = validate(&manifests, &NamingConvention::default());
//! assert!(!report.passed());
//! assert_eq!(report.violations.len(), 1);
//! # Ok::<(), asmguard::manifest::ManifestError>(())
//! ```

pub mod config;
pub mod domain;
pub mod formatters;
pub mod manifest;
pub mod ui;
pub mod validation;

/// Default path constants.
pub mod paths {
    /// Project config file, relative to the validated root: `.asmguard/config.md`
    pub const CONFIG_FILE: &str = ".asmguard/config.md";
    /// Global config file, relative to the home directory
    pub const GLOBAL_CONFIG_FILE: &str = ".config/asmguard/config.md";
    /// Default manifest discovery pattern
    pub const MANIFEST_PATTERN: &str = "**/*.asmdef";
}
