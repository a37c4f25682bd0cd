//! Command module structure for asmguard CLI

use anyhow::{Context, Result};
use std::path::Path;

use asmguard::config::{Config, Overrides};
use asmguard::manifest::{self, LoadOutcome};

pub mod check;
pub mod modules;
pub mod util;

/// Ensure the root is a directory and load its merged configuration.
pub fn load_config(root: &Path, overrides: Overrides) -> Result<Config> {
    if !root.is_dir() {
        anyhow::bail!("Root '{}' is not a directory", root.display());
    }
    Config::load(root)?.apply(overrides)
}

/// Discover and parse the manifests under `root`.
pub fn load_manifests(root: &Path, config: &Config) -> Result<LoadOutcome> {
    manifest::load_dir(root, &config.load_options())
        .with_context(|| format!("Failed to load manifests from {}", root.display()))
}
