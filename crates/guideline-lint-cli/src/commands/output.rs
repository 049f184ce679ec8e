//! Shared output formatting for validation results.

use anyhow::{Context, Result};
use guideline_lint_core::{FileSet, LocatorRenderer, Reporter, TerminalCapabilities, ValidationReport};
use std::io::Write;

use crate::OutputFormat;

/// Prints the run header. Verbose runs also show hyperlink detection.
pub fn banner(verbose: bool, capabilities: TerminalCapabilities) {
    println!("🚀 NestJS Coding Guidelines Validator");
    println!("{}", "=".repeat(37));

    if verbose {
        let terminal = std::env::var("TERM_PROGRAM")
            .or_else(|_| std::env::var("TERM"))
            .unwrap_or_else(|_| "unknown terminal".to_string());
        let support = if capabilities.hyperlinks { "yes" } else { "no" };
        println!("🔗 Hyperlink support: {support} ({terminal})");
    }
}

/// Lists the files about to be checked.
pub fn selected(files: &FileSet) {
    let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    println!("🔍 Checking {} file(s): {}", names.len(), names.join(", "));
}

/// Prints selection warnings to stderr regardless of the log level.
pub fn selection_warnings(warnings: &[String]) -> Result<()> {
    let mut stderr = std::io::stderr().lock();
    write_warnings(warnings, &mut stderr).context("Failed to write warnings")
}

fn write_warnings(warnings: &[String], out: &mut dyn Write) -> std::io::Result<()> {
    for warning in warnings {
        writeln!(out, "⚠️  {warning}")?;
    }
    Ok(())
}

/// Reports that change-set selection found nothing to check.
pub fn nothing_changed(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("✅ No changed TypeScript files to check.");
            Ok(())
        }
        OutputFormat::Json => print_json(&ValidationReport::new()),
    }
}

/// Prints the report in the specified format.
pub fn print(
    report: &ValidationReport,
    format: OutputFormat,
    verbose: bool,
    locator: Box<dyn LocatorRenderer>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let mut stdout = std::io::stdout().lock();
            Reporter::new(verbose, locator)
                .write(report, &mut stdout)
                .context("Failed to write report")?;
            stdout.flush().context("Failed to write report")
        }
        OutputFormat::Json => print_json(report),
    }
}

fn print_json(report: &ValidationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
