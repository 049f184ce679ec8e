//! List rules command implementation.

use guideline_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<8} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nRules run in the order listed. Disable one in guidelines.toml:");
    println!("  [rules.interface-naming]");
    println!("  enabled = false");
}
