//! CLI entry point for asmguard.

mod cli;
mod cmd;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands};

/// Validation found a cycle or an isolation violation.
const EXIT_FAILED: u8 = 1;
/// The run could not complete.
const EXIT_ABORTED: u8 = 2;

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("ASMGUARD_LOG").unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
    if cli.quiet {
        std::env::set_var("ASMGUARD_QUIET", "1");
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILED),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

/// Returns `Ok(false)` when a check ran to completion and failed.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Check {
            root,
            format,
            duplicates,
            platform_prefix,
            pattern,
        } => cmd::check::cmd_check(cmd::check::CheckArgs {
            root: &root,
            format,
            duplicates: duplicates.as_deref(),
            platform_prefix,
            pattern,
        }),
        Commands::Modules { root, pattern } => {
            cmd::modules::cmd_modules(&root, pattern).map(|_| true)
        }
        Commands::Completion { shell } => cmd::util::cmd_completion(shell).map(|_| true),
        Commands::Version => cmd::util::cmd_version().map(|_| true),
    }
}
