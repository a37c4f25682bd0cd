//! Shared-namespace isolation policy.
//!
//! Modules fall into one of three groups. Shared modules form the
//! architectural base layer and must not depend on feature modules; platform
//! modules (first-party framework assemblies) are exempt from the rule.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::graph::DependencyGraph;

/// Default marker that puts a module in the shared group.
pub const DEFAULT_SHARED_MARKER: &str = "Shared";
/// Default marker for first-party platform modules.
pub const DEFAULT_PLATFORM_PREFIX: &str = "Unity.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleGroup {
    Shared,
    Platform,
    Feature,
}

impl fmt::Display for ModuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => write!(f, "shared"),
            Self::Platform => write!(f, "platform"),
            Self::Feature => write!(f, "feature"),
        }
    }
}

/// Assigns every module name to exactly one group.
pub trait ModuleClassifier {
    fn classify(&self, name: &str) -> ModuleGroup;
}

impl<F> ModuleClassifier for F
where
    F: Fn(&str) -> ModuleGroup,
{
    fn classify(&self, name: &str) -> ModuleGroup {
        self(name)
    }
}

/// How a [`ClassificationRule`] pattern is matched against a module name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Case-sensitive substring
    #[default]
    Contains,
    /// Case-sensitive prefix
    Prefix,
    /// Regular expression, unanchored
    Regex,
}

#[derive(Debug, Clone)]
enum Matcher {
    Contains(String),
    Prefix(String),
    Regex(Regex),
}

/// One row of the classification table.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    matcher: Matcher,
    group: ModuleGroup,
}

impl ClassificationRule {
    pub fn contains(pattern: impl Into<String>, group: ModuleGroup) -> Self {
        Self {
            matcher: Matcher::Contains(pattern.into()),
            group,
        }
    }

    pub fn prefix(pattern: impl Into<String>, group: ModuleGroup) -> Self {
        Self {
            matcher: Matcher::Prefix(pattern.into()),
            group,
        }
    }

    pub fn regex(pattern: &str, group: ModuleGroup) -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: Matcher::Regex(Regex::new(pattern)?),
            group,
        })
    }

    pub fn compile(
        kind: MatchKind,
        pattern: &str,
        group: ModuleGroup,
    ) -> Result<Self, regex::Error> {
        match kind {
            MatchKind::Contains => Ok(Self::contains(pattern, group)),
            MatchKind::Prefix => Ok(Self::prefix(pattern, group)),
            MatchKind::Regex => Self::regex(pattern, group),
        }
    }

    pub fn group(&self) -> ModuleGroup {
        self.group
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Contains(p) => name.contains(p.as_str()),
            Matcher::Prefix(p) => name.starts_with(p.as_str()),
            Matcher::Regex(re) => re.is_match(name),
        }
    }
}

/// Table-driven classifier: the first matching rule wins, unmatched names are
/// [`ModuleGroup::Feature`].
#[derive(Debug, Clone)]
pub struct NamingConvention {
    rules: Vec<ClassificationRule>,
}

impl NamingConvention {
    /// Shared if the name contains `shared_marker`, otherwise platform if it
    /// contains `platform_prefix`, otherwise feature.
    pub fn new(shared_marker: impl Into<String>, platform_prefix: impl Into<String>) -> Self {
        Self {
            rules: vec![
                ClassificationRule::contains(shared_marker, ModuleGroup::Shared),
                ClassificationRule::contains(platform_prefix, ModuleGroup::Platform),
            ],
        }
    }

    pub fn from_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new(DEFAULT_SHARED_MARKER, DEFAULT_PLATFORM_PREFIX)
    }
}

impl ModuleClassifier for NamingConvention {
    fn classify(&self, name: &str) -> ModuleGroup {
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(ClassificationRule::group)
            .unwrap_or(ModuleGroup::Feature)
    }
}

/// A forbidden edge from a shared module to a feature module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsolationViolation {
    pub shared: String,
    pub feature: String,
}

impl fmt::Display for IsolationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shared assembly '{}' imports from feature assembly '{}'",
            self.shared, self.feature
        )
    }
}

/// Collect every shared → feature edge in the graph.
///
/// Sources are visited in ascending order and targets in stored order. Every
/// offending edge is reported.
pub fn check_isolation(
    graph: &DependencyGraph,
    classifier: &dyn ModuleClassifier,
) -> Vec<IsolationViolation> {
    graph
        .edges()
        .filter(|(from, to)| {
            classifier.classify(from) == ModuleGroup::Shared
                && classifier.classify(to) == ModuleGroup::Feature
        })
        .map(|(from, to)| IsolationViolation {
            shared: from.to_string(),
            feature: to.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, ManifestSet};

    fn graph(modules: &[(&str, &[&str])]) -> DependencyGraph {
        let set = ManifestSet::from_manifests(
            modules
                .iter()
                .map(|(name, refs)| Manifest::new(*name, refs.iter().copied())),
        )
        .unwrap();
        DependencyGraph::build(&set)
    }

    #[test]
    fn test_default_classification() {
        let c = NamingConvention::default();
        assert_eq!(c.classify("SharedCore"), ModuleGroup::Shared);
        assert_eq!(c.classify("Game.Shared.Math"), ModuleGroup::Shared);
        assert_eq!(c.classify("Unity.Entities"), ModuleGroup::Platform);
        assert_eq!(c.classify("FeatureLogin"), ModuleGroup::Feature);
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        let c = NamingConvention::default();
        assert_eq!(c.classify("sharedcore"), ModuleGroup::Feature);
        assert_eq!(c.classify("unity.entities"), ModuleGroup::Feature);
    }

    #[test]
    fn test_shared_takes_precedence_over_platform() {
        let c = NamingConvention::default();
        assert_eq!(c.classify("Unity.SharedTools"), ModuleGroup::Shared);
    }

    #[test]
    fn test_custom_platform_prefix() {
        let c = NamingConvention::new("Shared", "Engine.");
        assert_eq!(c.classify("Engine.Render"), ModuleGroup::Platform);
        assert_eq!(c.classify("Unity.Entities"), ModuleGroup::Feature);
    }

    #[test]
    fn test_rule_table() {
        let c = NamingConvention::from_rules(vec![
            ClassificationRule::prefix("Core.", ModuleGroup::Shared),
            ClassificationRule::regex(r"^(Unity|TMPro)\b", ModuleGroup::Platform).unwrap(),
        ]);
        assert_eq!(c.classify("Core.Math"), ModuleGroup::Shared);
        assert_eq!(c.classify("Game.Core.Math"), ModuleGroup::Feature);
        assert_eq!(c.classify("TMPro"), ModuleGroup::Platform);
        assert_eq!(c.classify("Unity.Burst"), ModuleGroup::Platform);
    }

    #[test]
    fn test_compile_rejects_bad_regex() {
        assert!(ClassificationRule::compile(MatchKind::Regex, "(", ModuleGroup::Shared).is_err());
        assert!(ClassificationRule::compile(MatchKind::Contains, "(", ModuleGroup::Shared).is_ok());
    }

    #[test]
    fn test_closure_classifier() {
        let everything_shared = |_: &str| ModuleGroup::Shared;
        assert_eq!(everything_shared.classify("Anything"), ModuleGroup::Shared);
    }

    #[test]
    fn test_check_isolation_single_violation() {
        let g = graph(&[("SharedCore", &["FeatureLogin"]), ("FeatureLogin", &[])]);
        let violations = check_isolation(&g, &NamingConvention::default());
        assert_eq!(
            violations,
            vec![IsolationViolation {
                shared: "SharedCore".to_string(),
                feature: "FeatureLogin".to_string(),
            }]
        );
    }

    #[test]
    fn test_check_isolation_allowed_edges() {
        let g = graph(&[
            ("SharedCore", &["SharedMath", "Unity.Mathematics"]),
            ("SharedMath", &[]),
            ("Unity.Mathematics", &[]),
            ("FeatureLogin", &["SharedCore", "Unity.Mathematics"]),
        ]);
        assert!(check_isolation(&g, &NamingConvention::default()).is_empty());
    }

    #[test]
    fn test_check_isolation_reports_all() {
        let g = graph(&[
            ("SharedA", &["Feature1", "Feature2"]),
            ("SharedB", &["Feature1"]),
            ("Feature1", &[]),
            ("Feature2", &[]),
        ]);
        let violations = check_isolation(&g, &NamingConvention::default());
        let pairs: Vec<(&str, &str)> = violations
            .iter()
            .map(|v| (v.shared.as_str(), v.feature.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("SharedA", "Feature1"),
                ("SharedA", "Feature2"),
                ("SharedB", "Feature1"),
            ]
        );
    }

    #[test]
    fn test_check_isolation_ignores_unknown_references() {
        let g = graph(&[("SharedCore", &["FeatureGhost"])]);
        assert!(check_isolation(&g, &NamingConvention::default()).is_empty());
    }

    #[test]
    fn test_check_isolation_with_injected_classifier() {
        let g = graph(&[("Base", &["Top"]), ("Top", &[])]);
        let classify = |name: &str| {
            if name == "Base" {
                ModuleGroup::Shared
            } else {
                ModuleGroup::Feature
            }
        };
        assert_eq!(check_isolation(&g, &classify).len(), 1);
        assert!(check_isolation(&g, &NamingConvention::default()).is_empty());
    }

    #[test]
    fn test_violation_display() {
        let v = IsolationViolation {
            shared: "SharedCore".to_string(),
            feature: "FeatureLogin".to_string(),
        };
        assert_eq!(
            v.to_string(),
            "Shared assembly 'SharedCore' imports from feature assembly 'FeatureLogin'"
        );
    }
}
