//! Rule sets handed to the validator.

use guideline_lint_core::{Config, RuleBox};

use crate::file_naming::{self, FileNaming};
use crate::{ControllerReturnType, InterfaceNaming};

/// Returns the built-in rules in execution order, honoring rule options.
///
/// Order is fixed: file naming, interface naming, controller return types.
/// Enable flags are applied later by the validator builder.
#[must_use]
pub fn default_rules(config: &Config) -> Vec<RuleBox> {
    let file_naming = config
        .rule(file_naming::NAME)
        .and_then(|rule| rule.get_str_array("exemptions"))
        .map_or_else(FileNaming::new, FileNaming::with_exemptions);

    vec![
        Box::new(file_naming),
        Box::new(InterfaceNaming::new()),
        Box::new(ControllerReturnType::new()),
    ]
}

/// Returns every built-in rule with default options.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    default_rules(&Config::default())
}
