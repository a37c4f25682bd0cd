//! Validation of loaded configuration.

use anyhow::{Context, Result};

use super::defaults::{ManifestsConfig, PolicyConfig};
use crate::domain::isolation::{ClassificationRule, NamingConvention};

impl ManifestsConfig {
    /// Validate manifest discovery configuration
    pub fn validate(&self) -> Result<()> {
        if self.pattern.trim().is_empty() {
            anyhow::bail!("manifests.pattern must not be empty");
        }
        glob::Pattern::new(&self.pattern)
            .with_context(|| format!("manifests.pattern '{}' is not a valid glob", self.pattern))?;
        for exclude in &self.exclude {
            glob::Pattern::new(exclude)
                .with_context(|| format!("manifests.exclude '{}' is not a valid glob", exclude))?;
        }
        Ok(())
    }
}

impl PolicyConfig {
    /// Validate isolation policy configuration
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            if self.shared_marker.trim().is_empty() {
                anyhow::bail!("policy.shared_marker must not be empty");
            }
            if self.platform_prefix.trim().is_empty() {
                anyhow::bail!("policy.platform_prefix must not be empty");
            }
        }
        self.classifier().map(|_| ())
    }

    /// Build the classifier described by this policy.
    pub fn classifier(&self) -> Result<NamingConvention> {
        if self.rules.is_empty() {
            return Ok(NamingConvention::new(
                self.shared_marker.clone(),
                self.platform_prefix.clone(),
            ));
        }

        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                if rule.pattern.is_empty() {
                    anyhow::bail!("policy.rules[{}].pattern must not be empty", i);
                }
                ClassificationRule::compile(rule.kind, &rule.pattern, rule.group)
                    .with_context(|| format!("policy.rules[{}] has an invalid regex", i))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NamingConvention::from_rules(rules))
    }
}
