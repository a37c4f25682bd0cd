//! Configuration management for asmguard.
//!
//! Config files are markdown with a YAML frontmatter block, so the same file
//! can document the project's module conventions for humans.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::isolation::NamingConvention;
use crate::manifest::{DuplicatePolicy, LoadOptions};
use crate::paths::{CONFIG_FILE, GLOBAL_CONFIG_FILE};

pub mod defaults;
pub mod validation;

pub use defaults::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub manifests: ManifestsConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Values given on the command line. They override every config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub pattern: Option<String>,
    pub duplicates: Option<DuplicatePolicy>,
    pub platform_prefix: Option<String>,
}

impl Config {
    /// Load configuration for a validation root.
    /// Merge order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Global config (~/.config/asmguard/config.md)
    /// 3. Project config (<root>/.asmguard/config.md)
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_merged_from(global_config_path().as_deref(), &root.join(CONFIG_FILE))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        let config: Config =
            serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")?;

        config.validate()?;

        Ok(config)
    }

    /// Load merged configuration from the given global and project paths.
    /// Either file may be missing; missing files contribute nothing.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = Some(project_path)
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let config = global_config.merge_with(project_config);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.manifests.validate()?;
        self.policy.validate()
    }

    /// Apply command-line overrides and re-validate.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(pattern) = overrides.pattern {
            self.manifests.pattern = pattern;
        }
        if let Some(duplicates) = overrides.duplicates {
            self.manifests.duplicates = duplicates;
        }
        if let Some(prefix) = overrides.platform_prefix {
            if !self.policy.rules.is_empty() {
                anyhow::bail!(
                    "Platform prefix '{}' cannot be applied: policy.rules replaces the \
                     default naming convention, add a platform rule there instead",
                    prefix
                );
            }
            self.policy.platform_prefix = prefix;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            pattern: self.manifests.pattern.clone(),
            exclude: self.manifests.exclude.clone(),
            duplicates: self.manifests.duplicates,
        }
    }

    pub fn classifier(&self) -> Result<NamingConvention> {
        self.policy.classifier()
    }
}

/// Returns the path to the global config file at ~/.config/asmguard/config.md
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_FILE))
}

/// Split `---` delimited YAML frontmatter from the markdown body.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    if !content.starts_with("---") {
        return (None, content);
    }

    let rest = &content[3..];
    if let Some(end) = rest.find("\n---") {
        let frontmatter = rest[..end].to_string();
        let body = rest[end + 4..].trim_start();
        (Some(frontmatter), body)
    } else {
        (None, content)
    }
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub manifests: Option<PartialManifestsConfig>,
    pub policy: Option<PartialPolicyConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialManifestsConfig {
    pub pattern: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub duplicates: Option<DuplicatePolicy>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialPolicyConfig {
    pub shared_marker: Option<String>,
    pub platform_prefix: Option<String>,
    pub rules: Option<Vec<RuleConfig>>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        // An empty frontmatter block deserializes as YAML null
        if frontmatter.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_manifests = self.manifests.unwrap_or_default();
        let global_policy = self.policy.unwrap_or_default();
        let project_manifests = project.manifests.unwrap_or_default();
        let project_policy = project.policy.unwrap_or_default();

        Config {
            manifests: ManifestsConfig {
                // Project value > global value > default
                pattern: project_manifests
                    .pattern
                    .or(global_manifests.pattern)
                    .unwrap_or_else(defaults::default_pattern),
                exclude: project_manifests
                    .exclude
                    .or(global_manifests.exclude)
                    .unwrap_or_else(defaults::default_exclude),
                duplicates: project_manifests
                    .duplicates
                    .or(global_manifests.duplicates)
                    .unwrap_or_default(),
            },
            policy: PolicyConfig {
                shared_marker: project_policy
                    .shared_marker
                    .or(global_policy.shared_marker)
                    .unwrap_or_else(defaults::default_shared_marker),
                platform_prefix: project_policy
                    .platform_prefix
                    .or(global_policy.platform_prefix)
                    .unwrap_or_else(defaults::default_platform_prefix),
                // Rule tables replace each other wholesale
                rules: project_policy
                    .rules
                    .or(global_policy.rules)
                    .unwrap_or_default(),
            },
        }
    }
}
