//! Validation driver and report.
//!
//! A run moves through fixed stages:
//! `Start → GraphBuilt → CycleChecked → IsolationChecked → Done`.
//! Each stage is its own type and only the previous stage can produce it, so
//! a stage cannot be skipped or run out of order. Both checks always run; a
//! cycle does not stop the isolation check.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::domain::cycle::{find_cycle, Cycle};
use crate::domain::graph::DependencyGraph;
use crate::domain::isolation::{check_isolation, IsolationViolation, ModuleClassifier};
use crate::manifest::{DuplicateDefinition, ManifestSet, SkippedManifest};

/// Stage of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    GraphBuilt,
    CycleChecked,
    IsolationChecked,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::GraphBuilt => write!(f, "graph built"),
            Self::CycleChecked => write!(f, "cycle checked"),
            Self::IsolationChecked => write!(f, "isolation checked"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Marker trait for the typed stages of [`Validation`].
pub trait ValidationState {
    const STAGE: Stage;
}

pub struct Start<'a> {
    manifests: &'a ManifestSet,
}

pub struct GraphBuilt<'a> {
    manifests: &'a ManifestSet,
    graph: DependencyGraph,
}

pub struct CycleChecked<'a> {
    manifests: &'a ManifestSet,
    graph: DependencyGraph,
    cycle: Option<Cycle>,
}

pub struct IsolationChecked<'a> {
    manifests: &'a ManifestSet,
    graph: DependencyGraph,
    cycle: Option<Cycle>,
    violations: Vec<IsolationViolation>,
}

impl ValidationState for Start<'_> {
    const STAGE: Stage = Stage::Start;
}
impl ValidationState for GraphBuilt<'_> {
    const STAGE: Stage = Stage::GraphBuilt;
}
impl ValidationState for CycleChecked<'_> {
    const STAGE: Stage = Stage::CycleChecked;
}
impl ValidationState for IsolationChecked<'_> {
    const STAGE: Stage = Stage::IsolationChecked;
}

/// A validation run in stage `S`.
pub struct Validation<S> {
    state: S,
}

impl<S: ValidationState> Validation<S> {
    pub fn stage(&self) -> Stage {
        S::STAGE
    }
}

impl<'a> Validation<Start<'a>> {
    pub fn new(manifests: &'a ManifestSet) -> Self {
        Self {
            state: Start { manifests },
        }
    }

    pub fn build_graph(self) -> Validation<GraphBuilt<'a>> {
        let manifests = self.state.manifests;
        let graph = DependencyGraph::build(manifests);
        debug!(
            modules = graph.module_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        Validation {
            state: GraphBuilt { manifests, graph },
        }
    }
}

impl<'a> Validation<GraphBuilt<'a>> {
    pub fn graph(&self) -> &DependencyGraph {
        &self.state.graph
    }

    pub fn check_cycles(self) -> Validation<CycleChecked<'a>> {
        let GraphBuilt { manifests, graph } = self.state;
        let cycle = find_cycle(&graph);
        match &cycle {
            Some(c) => info!(cycle = %c, "dependency cycle found"),
            None => debug!("no dependency cycle"),
        }
        Validation {
            state: CycleChecked {
                manifests,
                graph,
                cycle,
            },
        }
    }
}

impl<'a> Validation<CycleChecked<'a>> {
    pub fn cycle(&self) -> Option<&Cycle> {
        self.state.cycle.as_ref()
    }

    pub fn check_isolation(
        self,
        classifier: &dyn ModuleClassifier,
    ) -> Validation<IsolationChecked<'a>> {
        let CycleChecked {
            manifests,
            graph,
            cycle,
        } = self.state;
        let violations = check_isolation(&graph, classifier);
        debug!(violations = violations.len(), "isolation checked");
        Validation {
            state: IsolationChecked {
                manifests,
                graph,
                cycle,
                violations,
            },
        }
    }
}

impl Validation<IsolationChecked<'_>> {
    pub fn violations(&self) -> &[IsolationViolation] {
        &self.state.violations
    }

    /// Close the run and produce the report.
    pub fn finish(self) -> ValidationReport {
        let IsolationChecked {
            manifests,
            graph,
            cycle,
            violations,
        } = self.state;

        let verdict = if cycle.is_some() || !violations.is_empty() {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        ValidationReport {
            verdict,
            module_count: graph.module_count(),
            edge_count: graph.edge_count(),
            cycle,
            violations,
            duplicates: manifests.duplicates().to_vec(),
            skipped: Vec::new(),
            stage: Stage::Done,
        }
    }
}

/// Run every stage over `manifests`.
pub fn validate(manifests: &ManifestSet, classifier: &dyn ModuleClassifier) -> ValidationReport {
    Validation::new(manifests)
        .build_graph()
        .check_cycles()
        .check_isolation(classifier)
        .finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub verdict: Verdict,
    pub cycle: Option<Cycle>,
    pub violations: Vec<IsolationViolation>,
    pub duplicates: Vec<DuplicateDefinition>,
    /// Manifest files excluded because they could not be read or parsed
    pub skipped: Vec<SkippedManifest>,
    pub module_count: usize,
    pub edge_count: usize,
    pub stage: Stage,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Attach the loader's skipped manifests. They are warnings and do not
    /// change the verdict.
    pub fn with_skipped(mut self, skipped: Vec<SkippedManifest>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Findings as display-ready issues, errors first.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if let Some(cycle) = &self.cycle {
            let first = cycle.path().first().cloned().unwrap_or_default();
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    IssueCategory::Cycle,
                    first,
                    format!("Circular dependency detected: {}", cycle),
                )
                .with_suggestion(
                    "Break the loop by moving the shared code into a lower-level assembly",
                ),
            );
        }

        for violation in &self.violations {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    IssueCategory::Isolation,
                    violation.shared.clone(),
                    violation.to_string(),
                )
                .with_suggestion(format!(
                    "Remove '{}' from the references of '{}'",
                    violation.feature, violation.shared
                )),
            );
        }

        for duplicate in &self.duplicates {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                IssueCategory::Duplicate,
                duplicate.name.clone(),
                format!(
                    "Declared more than once; using {} and ignoring {}",
                    duplicate.kept.display(),
                    duplicate.discarded.display()
                ),
            ));
        }

        for skipped in &self.skipped {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                IssueCategory::Manifest,
                skipped.path.display().to_string(),
                skipped.reason.clone(),
            ));
        }

        issues
    }

    pub fn error_count(&self) -> usize {
        usize::from(self.cycle.is_some()) + self.violations.len()
    }

    pub fn warning_count(&self) -> usize {
        self.duplicates.len() + self.skipped.len()
    }
}

/// Category of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Cycle,
    Isolation,
    Duplicate,
    Manifest,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle => write!(f, "Cycle"),
            Self::Isolation => write!(f, "Isolation"),
            Self::Duplicate => write!(f, "Duplicate"),
            Self::Manifest => write!(f, "Manifest"),
        }
    }
}

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning - should be addressed but does not fail the run
    Warning,
    /// Error - fails the run
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A single validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: IssueCategory,
    /// Module name or manifest path the issue is about
    pub item_id: String,
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        item_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            item_id: item_id.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
