//! Core types for guideline findings and validation reports.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity level for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never fails the run.
    Warning,
    /// Must be fixed; fails the run.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single guideline violation or warning produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule code (e.g., "GL001").
    pub code: String,
    /// Rule name (e.g., "file-naming").
    pub rule: String,
    /// File the finding belongs to.
    pub file: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Line number (1-indexed), if the finding points into the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Column number (1-indexed), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Severity of this finding.
    pub severity: Severity,
}

impl Finding {
    /// Creates a finding without a source position.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        file: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            file: file.into(),
            message: message.into(),
            line: None,
            column: None,
            severity,
        }
    }

    /// Attaches a line and column (both 1-indexed).
    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Attaches a line without a column.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Returns true for error-severity findings.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Plain `path:line:column` locator; the position part is omitted when
    /// the finding has no line.
    #[must_use]
    pub fn locator(&self) -> String {
        match self.line {
            Some(line) => format!(
                "{}:{}:{}",
                self.file.display(),
                line,
                self.column.unwrap_or(0)
            ),
            None => self.file.display().to_string(),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.locator(),
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Findings of one file, in rule-registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFindings {
    /// The validated file.
    pub file: PathBuf,
    /// Findings in the order rules produced them.
    pub findings: Vec<Finding>,
}

impl FileFindings {
    /// Number of error findings in this file.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    /// Number of warning findings in this file.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }
}

/// Final outcome of one validation run.
///
/// Built incrementally by the [`Validator`](crate::Validator) and handed to a
/// reporter once every file has been processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff no error-severity finding was produced.
    pub success: bool,
    /// Total error findings.
    pub error_count: usize,
    /// Total warning findings.
    pub warning_count: usize,
    /// Number of files validated.
    pub files_checked: usize,
    /// Files with at least one finding, in discovery order.
    pub files: Vec<FileFindings>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    /// Creates an empty, successful report.
    #[must_use]
    pub fn new() -> Self {
        Self {
            success: true,
            error_count: 0,
            warning_count: 0,
            files_checked: 0,
            files: Vec::new(),
        }
    }

    /// Records the findings of one file. Files without findings only bump
    /// the checked counter.
    pub fn record(&mut self, file: &Path, findings: Vec<Finding>) {
        self.files_checked += 1;
        if findings.is_empty() {
            return;
        }

        let errors = findings.iter().filter(|f| f.is_error()).count();
        self.error_count += errors;
        self.warning_count += findings.len() - errors;
        self.success = self.error_count == 0;

        match self.files.iter_mut().find(|g| g.file == file) {
            Some(group) => group.findings.extend(findings),
            None => self.files.push(FileFindings {
                file: file.to_path_buf(),
                findings,
            }),
        }
    }

    /// Iterates every finding in report order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(|g| g.findings.iter())
    }

    /// Returns findings filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings().filter(|f| f.severity == severity).collect()
    }

    /// Returns true if any finding was produced.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.files.is_empty()
    }

    /// Findings grouped under `file`, if any.
    #[must_use]
    pub fn for_file(&self, file: &Path) -> Option<&FileFindings> {
        self.files.iter().find(|g| g.file == file)
    }
}
