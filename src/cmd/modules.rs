//! `asmguard modules`: list discovered modules.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use asmguard::config::Overrides;
use asmguard::domain::DependencyGraph;
use asmguard::formatters::{format_module_list, module_rows};

pub fn cmd_modules(root: &Path, pattern: Option<String>) -> Result<()> {
    let config = super::load_config(
        root,
        Overrides {
            pattern,
            ..Default::default()
        },
    )?;
    let classifier = config.classifier()?;
    let outcome = super::load_manifests(root, &config)?;

    for skipped in &outcome.skipped {
        eprintln!("{} {}", "Warning:".yellow(), skipped.reason);
    }

    let graph = DependencyGraph::build(&outcome.manifests);
    println!("{}", format_module_list(&module_rows(&graph, &classifier)));

    Ok(())
}
