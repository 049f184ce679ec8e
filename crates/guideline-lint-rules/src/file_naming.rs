//! Rule requiring PascalCase TypeScript file names.
//!
//! # Checks
//!
//! - The base name (file name without `.ts`) must start with an uppercase
//!   letter.
//! - The file name may only contain letters, digits, `-` and `.`.
//! - Names using `-` or `_` separators get a warning with the PascalCase
//!   suggestion (`user-profile.ts` → `UserProfile.ts`).
//!
//! Framework entry points (`main.ts`, `index.ts`, `app.module.ts`, ...) are
//! exempt.
//!
//! # Configuration
//!
//! - `exemptions`: file names skipped by this rule (case-insensitive);
//!   replaces the default list

use guideline_lint_core::{FileContext, Finding, Rule, RuleError, Severity};

/// Rule code for file-naming.
pub const CODE: &str = "GL001";

/// Rule name for file-naming.
pub const NAME: &str = "file-naming";

/// File names exempt from the naming convention by default.
pub const DEFAULT_EXEMPTIONS: &[&str] = &[
    "main.ts",
    "index.ts",
    "app.module.ts",
    "app.controller.ts",
    "app.service.ts",
];

/// Enforces PascalCase file names.
#[derive(Debug, Clone)]
pub struct FileNaming {
    exemptions: Vec<String>,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl FileNaming {
    /// Creates the rule with the default exemptions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_exemptions(DEFAULT_EXEMPTIONS.iter().copied())
    }

    /// Creates the rule with a custom exemption list.
    #[must_use]
    pub fn with_exemptions<I, S>(exemptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exemptions: exemptions
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn is_exempt(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.exemptions.iter().any(|e| *e == lower)
    }
}

impl Rule for FileNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "File names must start with an uppercase letter (e.g. UserService.ts)"
    }

    fn check(&self, ctx: &FileContext) -> Result<Vec<Finding>, RuleError> {
        let file_name = ctx.file_name.as_str();
        if self.is_exempt(file_name) {
            return Ok(Vec::new());
        }

        let base = file_name.strip_suffix(".ts").unwrap_or(file_name);
        let mut findings = Vec::new();

        if !base.starts_with(|c: char| c.is_ascii_uppercase()) {
            findings.push(self.finding(
                ctx,
                Severity::Error,
                format!(
                    "File name '{file_name}' must start with an uppercase letter. Expected format: 'FileName.ts'"
                ),
            ));
        }

        if !has_allowed_characters(file_name) {
            findings.push(self.finding(
                ctx,
                Severity::Error,
                format!(
                    "File name '{file_name}' contains disallowed characters. Only letters, digits, hyphens and dots are allowed."
                ),
            ));
        }

        if base.contains(['-', '_']) {
            findings.push(self.finding(
                ctx,
                Severity::Warning,
                format!(
                    "File name '{file_name}' should use PascalCase instead of kebab-case or snake_case. Suggested name: '{}.ts'",
                    to_pascal_case(base)
                ),
            ));
        }

        Ok(findings)
    }
}

/// `^[A-Za-z0-9.-]+\.ts$`
fn has_allowed_characters(file_name: &str) -> bool {
    file_name.strip_suffix(".ts").is_some_and(|stem| {
        !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    })
}

/// Splits on `-`/`_`, capitalizes each word and lowercases the rest.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}
