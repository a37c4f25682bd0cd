//! `asmguard check`: run validation and report the verdict.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::info;

use asmguard::config::Overrides;
use asmguard::formatters;
use asmguard::manifest::DuplicatePolicy;
use asmguard::validation::validate;

use crate::cli::OutputFormat;

pub struct CheckArgs<'a> {
    pub root: &'a Path,
    pub format: OutputFormat,
    pub duplicates: Option<&'a str>,
    pub platform_prefix: Option<String>,
    pub pattern: Option<String>,
}

/// Returns whether validation passed.
pub fn cmd_check(args: CheckArgs<'_>) -> Result<bool> {
    let duplicates = args
        .duplicates
        .map(str::parse::<DuplicatePolicy>)
        .transpose()?;

    let config = super::load_config(
        args.root,
        Overrides {
            pattern: args.pattern,
            duplicates,
            platform_prefix: args.platform_prefix,
        },
    )?;
    let classifier = config.classifier()?;
    let quiet = asmguard::ui::is_quiet();
    let text = args.format == OutputFormat::Text;

    if text && !quiet {
        println!(
            "{} Analyzing assembly dependencies in {}",
            "→".cyan(),
            args.root.display()
        );
    }

    let outcome = super::load_manifests(args.root, &config)?;
    info!(
        discovered = outcome.discovered,
        loaded = outcome.manifests.len(),
        skipped = outcome.skipped.len(),
        "manifests loaded"
    );

    if text && !quiet {
        println!(
            "{} Found {} assembly definition files\n",
            "→".cyan(),
            outcome.discovered
        );
    }

    let report = validate(&outcome.manifests, &classifier).with_skipped(outcome.skipped);

    match args.format {
        OutputFormat::Json => println!("{}", formatters::format_report_json(&report)?),
        OutputFormat::Text if quiet => println!("{}", formatters::format_summary(&report)),
        OutputFormat::Text => println!("{}", formatters::format_report_text(&report)),
    }

    Ok(report.passed())
}
