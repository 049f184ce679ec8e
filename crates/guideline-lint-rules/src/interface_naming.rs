//! Rule requiring `I`-prefixed interface names.
//!
//! Every interface must be named `I` followed by an uppercase letter
//! (`IUser`, `IUserService`), and the name must be longer than two
//! characters. Files that fail to parse are scanned with a pattern instead.

use guideline_lint_core::{line_column, walk, FileContext, Finding, Rule, RuleError, Severity};
use guideline_lint_ts::{FileKind, TypeScriptParser};
use regex::Regex;
use tracing::debug;

/// Rule code for interface-naming.
pub const CODE: &str = "GL002";

/// Rule name for interface-naming.
pub const NAME: &str = "interface-naming";

const INTERFACE_PATTERN: &str = r"interface\s+([A-Za-z_$][A-Za-z0-9_$]*)";

/// Enforces the `I` prefix on interface names.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceNaming {
    parser: TypeScriptParser,
}

impl InterfaceNaming {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_name(&self, ctx: &FileContext, name: &str, line: usize, column: usize) -> Vec<Finding> {
        let mut findings = Vec::new();

        if !has_interface_prefix(name) {
            findings.push(
                self.finding(
                    ctx,
                    Severity::Error,
                    format!(
                        "Interface '{name}' must start with 'I' followed by an uppercase letter (e.g. IUser, IUserService). Current name: '{name}'"
                    ),
                )
                .at(line, column),
            );
        }

        if name == "I" || name.chars().count() <= 2 {
            findings.push(
                self.finding(
                    ctx,
                    Severity::Error,
                    format!(
                        "Interface name '{name}' is too short. Use a descriptive name such as IUser or IUserService."
                    ),
                )
                .at(line, column),
            );
        }

        findings
    }

    fn check_tree(&self, ctx: &FileContext, source: &str, kind: FileKind) -> Option<Vec<Finding>> {
        let tree = match self.parser.parse(source, kind) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("{}: {e}; using pattern fallback", ctx.path.display());
                return None;
            }
        };

        let mut findings = Vec::new();
        walk(tree.root(), |node| {
            if node.kind() != "interface_declaration" {
                return;
            }
            if let Some(name) = node.field("name") {
                let (line, column) = node.start();
                findings.extend(self.check_name(ctx, name.text(), line, column));
            }
        });
        Some(findings)
    }

    fn check_text(&self, ctx: &FileContext, source: &str) -> Result<Vec<Finding>, RuleError> {
        let pattern = Regex::new(INTERFACE_PATTERN).map_err(|e| RuleError::Pattern(e.to_string()))?;

        let mut findings = Vec::new();
        for caps in pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let (line, column) = line_column(source, whole.start());
            findings.extend(self.check_name(ctx, name.as_str(), line, column));
        }
        Ok(findings)
    }
}

impl Rule for InterfaceNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Interfaces must start with 'I' followed by an uppercase letter (e.g. IUser)"
    }

    fn check(&self, ctx: &FileContext) -> Result<Vec<Finding>, RuleError> {
        let source = ctx.read_source()?;
        match self.check_tree(ctx, &source, FileKind::from_path(ctx.path)) {
            Some(findings) => Ok(findings),
            None => self.check_text(ctx, &source),
        }
    }
}

/// `^I[A-Z]`
fn has_interface_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}
