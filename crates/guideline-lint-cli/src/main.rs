//! guideline-lint CLI tool.
//!
//! Usage:
//! ```bash
//! guideline-lint                     # changed files in the working tree
//! guideline-lint --branch main       # files changed against a branch
//! guideline-lint --all               # every TypeScript file in the project
//! guideline-lint src/users/User.controller.ts
//! guideline-lint --list-rules
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

use commands::check::CheckOptions;

/// NestJS coding guidelines validator
#[derive(Parser)]
#[command(name = "guideline-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to check (default: changed files)
    files: Vec<PathBuf>,

    /// Check every TypeScript file in the project
    #[arg(short, long)]
    all: bool,

    /// Show every finding with its message
    #[arg(short, long)]
    verbose: bool,

    /// Check files changed against this branch or commit
    #[arg(short, long, value_name = "NAME")]
    branch: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,
}

/// Output format for validation results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report grouped by file.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; logs go to stderr so stdout carries only the report.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_rules {
        commands::list_rules::run();
        return Ok(());
    }

    let root = std::env::current_dir().context("Cannot determine the current directory")?;
    let options = CheckOptions {
        files: cli.files,
        all: cli.all,
        branch: cli.branch,
        verbose: cli.verbose,
        format: cli.format,
        config: cli.config,
    };

    if !commands::check::run(&root, &options)? {
        std::process::exit(1);
    }
    Ok(())
}
