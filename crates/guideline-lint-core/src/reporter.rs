//! Terminal rendering of a [`ValidationReport`].
//!
//! Everything here is presentation: the report is already final when it
//! reaches the [`Reporter`], and nothing in this module feeds back into
//! counts or success.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::types::{Finding, Severity, ValidationReport};

/// Number of findings shown per file in the non-verbose report.
const PREVIEW_LIMIT: usize = 3;

/// Renders the source locator of a finding.
pub trait LocatorRenderer: Send + Sync {
    /// Returns the text that points at `finding`'s file and position.
    fn render(&self, finding: &Finding) -> String;
}

/// Plain `path:line:column` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLocator;

impl LocatorRenderer for PlainLocator {
    fn render(&self, finding: &Finding) -> String {
        finding.locator()
    }
}

/// OSC 8 terminal hyperlink pointing at `file://<absolute path>[:line]`.
#[derive(Debug, Clone)]
pub struct HyperlinkLocator {
    base: PathBuf,
}

impl HyperlinkLocator {
    /// Creates a renderer resolving relative paths against `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn absolute(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.base.join(file)
        }
    }
}

impl LocatorRenderer for HyperlinkLocator {
    fn render(&self, finding: &Finding) -> String {
        let mut url = format!("file://{}", self.absolute(&finding.file).display());
        if let Some(line) = finding.line {
            url.push_str(&format!(":{line}"));
        }
        format!(
            "\x1b]8;;{url}\x1b\\\x1b[34m\x1b[4m{}\x1b[0m\x1b]8;;\x1b\\",
            finding.locator()
        )
    }
}

/// Whether the hosting terminal is believed to support hyperlinks.
///
/// The detection is a heuristic allow-list of environment signals and can
/// misclassify unusual terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// OSC 8 hyperlinks are supported.
    pub hyperlinks: bool,
}

impl TerminalCapabilities {
    /// Detects capabilities from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Detects capabilities from an arbitrary environment lookup.
    #[must_use]
    pub fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        let term_program = var("TERM_PROGRAM").unwrap_or_default();
        let term = var("TERM").unwrap_or_default();
        let emulator = var("TERMINAL_EMULATOR").unwrap_or_default();

        let hyperlinks = matches!(
            term_program.as_str(),
            "vscode" | "Hyper" | "WezTerm" | "Alacritty"
        ) || term_program.contains("iTerm")
            || var("WT_SESSION").is_some()
            || emulator == "JetBrains-JediTerm"
            || term.contains("xterm")
            || term.contains("screen")
            || var("COLORTERM").as_deref() == Some("truecolor");

        Self { hyperlinks }
    }

    /// Picks the matching locator renderer.
    #[must_use]
    pub fn renderer(self, base: impl Into<PathBuf>) -> Box<dyn LocatorRenderer> {
        if self.hyperlinks {
            Box::new(HyperlinkLocator::new(base))
        } else {
            Box::new(PlainLocator)
        }
    }
}

/// Writes a human-readable report grouped by file.
pub struct Reporter {
    verbose: bool,
    locator: Box<dyn LocatorRenderer>,
}

impl Reporter {
    /// Creates a reporter.
    #[must_use]
    pub fn new(verbose: bool, locator: Box<dyn LocatorRenderer>) -> Self {
        Self { verbose, locator }
    }

    /// Writes the report to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write(&self, report: &ValidationReport, out: &mut dyn Write) -> io::Result<()> {
        if !report.has_findings() {
            writeln!(out, "✅ All coding guidelines passed!")?;
            return Ok(());
        }

        writeln!(out, "\n📋 VALIDATION RESULTS:")?;
        writeln!(out, "{}", "=".repeat(50))?;

        for group in &report.files {
            writeln!(out, "\n📄 {}", group.file.display())?;
            let errors = group.error_count();
            let warnings = group.warning_count();
            if errors > 0 {
                writeln!(out, "   ❌ Errors: {errors}")?;
            }
            if warnings > 0 {
                writeln!(out, "   ⚠️  Warnings: {warnings}")?;
            }

            if self.verbose {
                for finding in &group.findings {
                    writeln!(out, "     {} {}: {}", icon(finding), finding.rule, finding.message)?;
                    writeln!(out, "        📍 {}", self.locator.render(finding))?;
                }
            } else {
                for finding in group.findings.iter().take(PREVIEW_LIMIT) {
                    writeln!(
                        out,
                        "     {} {} → {}",
                        icon(finding),
                        finding.rule,
                        self.locator.render(finding)
                    )?;
                }
                if group.findings.len() > PREVIEW_LIMIT {
                    writeln!(
                        out,
                        "     ... and {} more",
                        group.findings.len() - PREVIEW_LIMIT
                    )?;
                }
            }
        }

        writeln!(out, "\n📊 SUMMARY:")?;
        writeln!(out, "   ❌ Total errors: {}", report.error_count)?;
        writeln!(out, "   ⚠️  Total warnings: {}", report.warning_count)?;

        if !self.verbose {
            writeln!(out, "\n💡 Run with --verbose for detailed messages")?;
        }
        Ok(())
    }

    /// Renders the report into a string.
    #[must_use]
    pub fn render(&self, report: &ValidationReport) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write(report, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn icon(finding: &Finding) -> &'static str {
    match finding.severity {
        Severity::Error => "❌",
        Severity::Warning => "⚠️",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn finding(n: usize, severity: Severity) -> Finding {
        Finding::new("GL002", "interface-naming", severity, "src/Bad.ts", format!("message {n}"))
            .at(n, 1)
    }

    fn report_with(count: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        let findings = (1..=count)
            .map(|n| {
                let severity = if n % 2 == 0 {
                    Severity::Warning
                } else {
                    Severity::Error
                };
                finding(n, severity)
            })
            .collect();
        report.record(Path::new("src/Bad.ts"), findings);
        report
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_report_prints_success_line() {
        let out = Reporter::new(false, Box::new(PlainLocator)).render(&ValidationReport::new());
        assert_eq!(out, "✅ All coding guidelines passed!\n");
    }

    #[test]
    fn compact_report_shows_three_findings_and_elides_rest() {
        let out = Reporter::new(false, Box::new(PlainLocator)).render(&report_with(5));

        assert!(out.contains("📄 src/Bad.ts"));
        assert!(out.contains("❌ Errors: 3"));
        assert!(out.contains("⚠️  Warnings: 2"));
        assert!(out.contains("interface-naming → src/Bad.ts:1:1"));
        assert!(out.contains("interface-naming → src/Bad.ts:3:1"));
        assert!(!out.contains("src/Bad.ts:4:1"));
        assert!(out.contains("... and 2 more"));
        assert!(!out.contains("message 1"));
        assert!(out.contains("--verbose"));
    }

    #[test]
    fn verbose_report_shows_every_message_and_locator() {
        let out = Reporter::new(true, Box::new(PlainLocator)).render(&report_with(5));

        for n in 1..=5 {
            assert!(out.contains(&format!("interface-naming: message {n}")));
            assert!(out.contains(&format!("📍 src/Bad.ts:{n}:1")));
        }
        assert!(!out.contains("more"));
        assert!(out.contains("Total errors: 3"));
        assert!(out.contains("Total warnings: 2"));
    }

    #[test]
    fn hyperlink_locator_wraps_plain_text() {
        let locator = HyperlinkLocator::new("/work/api");
        let rendered = locator.render(&finding(7, Severity::Error));
        assert!(rendered.starts_with("\x1b]8;;file:///work/api/src/Bad.ts:7\x1b\\"));
        assert!(rendered.contains("src/Bad.ts:7:1"));
        assert!(rendered.ends_with("\x1b]8;;\x1b\\"));
    }

    #[test]
    fn hyperlink_locator_without_line() {
        let locator = HyperlinkLocator::new("/work/api");
        let f = Finding::new("GL001", "file-naming", Severity::Error, "src/bad.ts", "casing");
        let rendered = locator.render(&f);
        assert!(rendered.starts_with("\x1b]8;;file:///work/api/src/bad.ts\x1b\\"));
    }

    #[test]
    fn detects_link_capable_terminals() {
        let yes = [
            vec![("TERM_PROGRAM", "vscode")],
            vec![("TERM_PROGRAM", "iTerm.app")],
            vec![("WT_SESSION", "abc")],
            vec![("TERMINAL_EMULATOR", "JetBrains-JediTerm")],
            vec![("TERM", "xterm-256color")],
            vec![("TERM", "screen")],
            vec![("COLORTERM", "truecolor")],
        ];
        for vars in yes {
            assert!(TerminalCapabilities::from_env(env(&vars)).hyperlinks, "{vars:?}");
        }

        let no = [vec![], vec![("TERM", "dumb")], vec![("COLORTERM", "24bit")]];
        for vars in no {
            assert!(!TerminalCapabilities::from_env(env(&vars)).hyperlinks, "{vars:?}");
        }
    }

    #[test]
    fn renderer_choice_does_not_change_counts() {
        let report = report_with(4);
        let plain = Reporter::new(false, Box::new(PlainLocator)).render(&report);
        let linked = Reporter::new(false, Box::new(HyperlinkLocator::new("/x"))).render(&report);

        for out in [plain, linked] {
            assert!(out.contains("Total errors: 2"));
            assert!(out.contains("Total warnings: 2"));
        }
    }
}
