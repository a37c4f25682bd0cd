//! CLI argument definitions for asmguard.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asmguard")]
#[command(version)]
#[command(about = "Validate assembly definition dependencies", long_about = None)]
#[command(
    after_help = "EXIT CODES:
    0    All checks passed
    1    A dependency cycle or isolation violation was found
    2    The run was aborted (bad config, unnamed manifest, duplicate in fail mode)"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). ASMGUARD_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check for dependency cycles and shared namespace violations
    Check {
        /// Project root to scan for manifests
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Duplicate module names: warn (keep last) or fail
        #[arg(long, value_name = "POLICY")]
        duplicates: Option<String>,
        /// Marker for first-party platform modules (default: "Unity.")
        #[arg(long, value_name = "PREFIX")]
        platform_prefix: Option<String>,
        /// Manifest glob relative to the root (default: "**/*.asmdef")
        #[arg(long, value_name = "GLOB")]
        pattern: Option<String>,
    },
    /// List discovered modules with their group and dependency count
    Modules {
        /// Project root to scan for manifests
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Manifest glob relative to the root (default: "**/*.asmdef")
        #[arg(long, value_name = "GLOB")]
        pattern: Option<String>,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version, commit and build date
    Version,
}
