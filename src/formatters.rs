//! Output formatters for validation reports
//!
//! Provides formatters that transform a [`ValidationReport`] into text or JSON.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::domain::graph::DependencyGraph;
use crate::domain::isolation::{ModuleClassifier, ModuleGroup};
use crate::ui::{self, format};
use crate::validation::{Severity, ValidationIssue, ValidationReport};

const SEPARATOR_WIDTH: usize = 60;

/// Format a single issue, with its suggestion on a second line if present.
pub fn format_issue(issue: &ValidationIssue) -> String {
    let mut out = format!(
        "  {} {} [{}]: {}",
        ui::severity_icon(issue.severity),
        issue.item_id.cyan(),
        issue.category,
        issue.message
    );
    if let Some(suggestion) = &issue.suggestion {
        out.push_str(&format!("\n      {} {}", "→".cyan(), suggestion));
    }
    out
}

/// Format the report as sectioned text: cycle, isolation, warnings, summary.
pub fn format_report_text(report: &ValidationReport) -> String {
    let issues = report.issues();
    let mut output = Vec::new();

    output.push("Circular dependencies".bold().to_string());
    match &report.cycle {
        Some(cycle) => {
            output.push(format!("  {} Circular dependency detected:", "✗".red()));
            output.push(format!("     {}", cycle));
        }
        None => output.push(format!("  {} No circular dependencies detected", "✓".green())),
    }
    output.push(String::new());

    output.push("Shared namespace isolation".bold().to_string());
    if report.violations.is_empty() {
        output.push(format!("  {} Shared namespace properly isolated", "✓".green()));
    } else {
        for issue in issues
            .iter()
            .filter(|i| i.category == crate::validation::IssueCategory::Isolation)
        {
            output.push(format_issue(issue));
        }
    }

    let warnings: Vec<&ValidationIssue> = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .collect();
    if !warnings.is_empty() {
        output.push(String::new());
        output.push("Warnings".bold().to_string());
        for issue in warnings {
            output.push(format_issue(issue));
        }
    }

    output.push(String::new());
    output.push(format_summary(report));

    output.join("\n")
}

/// Format the closing summary block.
pub fn format_summary(report: &ValidationReport) -> String {
    let mut lines = vec![format::separator(SEPARATOR_WIDTH).cyan().to_string()];

    let mut headline = format!(
        "{} {}: {}, {}",
        ui::verdict_icon(report.verdict),
        report.verdict,
        format::count(report.module_count, "module", "modules"),
        format::count(report.edge_count, "dependency", "dependencies"),
    );

    let errors = report.error_count();
    let warnings = report.warning_count();
    if errors > 0 {
        headline.push_str(&format!(", {}", format::count(errors, "error", "errors").red()));
    }
    if warnings > 0 {
        headline.push_str(&format!(
            ", {}",
            format::count(warnings, "warning", "warnings").yellow()
        ));
    }
    lines.push(headline);
    lines.push(format::separator(SEPARATOR_WIDTH).cyan().to_string());

    lines.join("\n")
}

/// Format the report as pretty-printed JSON.
pub fn format_report_json(report: &ValidationReport) -> Result<String> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        passed: bool,
        #[serde(flatten)]
        report: &'a ValidationReport,
        issues: Vec<ValidationIssue>,
    }

    Ok(serde_json::to_string_pretty(&JsonReport {
        passed: report.passed(),
        report,
        issues: report.issues(),
    })?)
}

/// One row of the module listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRow {
    pub name: String,
    pub group: ModuleGroup,
    pub dependencies: usize,
}

/// Collect listing rows for every module in the graph, sorted by name.
pub fn module_rows(graph: &DependencyGraph, classifier: &dyn ModuleClassifier) -> Vec<ModuleRow> {
    graph
        .nodes()
        .map(|name| ModuleRow {
            name: name.to_string(),
            group: classifier.classify(name),
            dependencies: graph.dependencies(name).len(),
        })
        .collect()
}

/// Format the module listing with aligned group labels.
pub fn format_module_list(rows: &[ModuleRow]) -> String {
    if rows.is_empty() {
        return "(No modules found)".dimmed().to_string();
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut output = vec![format!(
        "{} {}:",
        "Discovered".bold(),
        format::count(rows.len(), "internal assembly", "internal assemblies")
    )];
    for row in rows {
        output.push(format!(
            "  - {:<width$}  {:<8}  ({})",
            row.name,
            ui::group_label(row.group),
            format::count(row.dependencies, "dependency", "dependencies"),
            width = width
        ));
    }
    output.join("\n")
}
