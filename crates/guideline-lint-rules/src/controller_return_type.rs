//! Rule requiring NestJS controller actions to return DTO types.
//!
//! # Rationale
//!
//! Controller actions define the HTTP contract. Returning primitives or
//! leaving the return type implicit hides that contract from readers and
//! from generated API documentation.
//!
//! # Detected Patterns
//!
//! Inside classes decorated with `@Controller`, every method decorated with
//! an HTTP verb (`@Get`, `@Post`, `@Put`, `@Delete`, `@Patch`, `@Options`,
//! `@Head`):
//!
//! - has no return type annotation (error)
//! - returns a primitive or otherwise non-DTO type (error)
//! - returns a `Promise` without being `async` (warning)
//!
//! Only files whose path mentions `controller` are inspected. Files that do
//! not parse are scanned with a pattern that can only detect missing return
//! types.

use guideline_lint_core::{line_column, walk, FileContext, Finding, Rule, RuleError, Severity};
use guideline_lint_ts::{FileKind, TsNode, TypeScriptParser};
use regex::Regex;
use tracing::debug;

use crate::file_naming::to_pascal_case;

/// Rule code for controller-return-type.
pub const CODE: &str = "GL003";

/// Rule name for controller-return-type.
pub const NAME: &str = "controller-return-type";

/// Decorators marking a method as an HTTP route handler.
const HTTP_DECORATORS: &[&str] = &["Get", "Post", "Put", "Delete", "Patch", "Options", "Head"];

/// Return types that never describe a DTO (compared case-insensitively).
const PRIMITIVE_TYPES: &[&str] = &["string", "number", "boolean", "any", "unknown", "void"];

const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];

const ROUTE_PATTERN: &str = r"@(Get|Post|Put|Delete|Patch|Options|Head)\b[^\n]*?\s+(async\s+)?([A-Za-z_$][A-Za-z0-9_$]*)\s*\(";

/// Enforces DTO return types on controller route handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerReturnType {
    parser: TypeScriptParser,
}

impl ControllerReturnType {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
            if !CLASS_KINDS.contains(&node.kind()) || !is_controller_class(*node) {
                return;
            }
            let Some(body) = node.field("body") else {
                return;
            };
            for method in body.children_of_kind("method_definition") {
                self.check_method(ctx, method, &mut findings);
            }
        });
        Some(findings)
    }

    fn check_method(&self, ctx: &FileContext, method: TsNode<'_>, findings: &mut Vec<Finding>) {
        let Some(name) = method
            .field("name")
            .filter(|n| n.kind() == "property_identifier")
        else {
            return;
        };
        if !is_route_handler(method) {
            return;
        }

        let name = name.text();
        let (line, column) = method.start();

        let Some(annotation) = method.field("return_type") else {
            findings.push(
                self.finding(
                    ctx,
                    Severity::Error,
                    format!(
                        "Controller method '{name}' must declare a return type. All controller actions must return DTO objects."
                    ),
                )
                .at(line, column),
            );
            return;
        };

        let return_type = resolve_return_type(annotation);

        if !is_valid_return_type(&return_type) {
            let (type_line, type_column) = annotation.start();
            findings.push(
                self.finding(
                    ctx,
                    Severity::Error,
                    format!(
                        "Controller method '{name}' returns '{return_type}', but a DTO object is expected (e.g. UserDto, CreateUserResponseDto). Primitive types and 'any' are not allowed."
                    ),
                )
                .at(type_line, type_column),
            );
        }

        if return_type.contains("Promise") && !method.has_token("async") {
            findings.push(
                self.finding(
                    ctx,
                    Severity::Warning,
                    format!("Controller method '{name}' returns a Promise but is not marked async."),
                )
                .at(line, column),
            );
        }
    }

    fn check_text(&self, ctx: &FileContext, source: &str) -> Result<Vec<Finding>, RuleError> {
        let pattern = Regex::new(ROUTE_PATTERN).map_err(|e| RuleError::Pattern(e.to_string()))?;

        let mut findings = Vec::new();
        for caps in pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(3)) else {
                continue;
            };
            let start = whole.start();
            let declaration = source[start..]
                .find('{')
                .map_or(&source[start..], |end| &source[start..start + end]);

            if !declaration.contains(':') {
                let (line, _) = line_column(source, start);
                findings.push(
                    self.finding(
                        ctx,
                        Severity::Error,
                        format!(
                            "Controller method '{}' must declare a return type (DTO object).",
                            name.as_str()
                        ),
                    )
                    .at_line(line),
                );
            }
        }
        Ok(findings)
    }
}

impl Rule for ControllerReturnType {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Controller actions must return DTO objects"
    }

    fn check(&self, ctx: &FileContext) -> Result<Vec<Finding>, RuleError> {
        if !is_controller_file(ctx) {
            return Ok(Vec::new());
        }

        let source = ctx.read_source()?;
        match self.check_tree(ctx, &source, FileKind::from_path(ctx.path)) {
            Some(findings) => Ok(findings),
            None => self.check_text(ctx, &source),
        }
    }
}

/// Whether the file path marks a controller.
#[must_use]
pub fn is_controller_file(ctx: &FileContext) -> bool {
    let path = ctx.lowercase_path();
    path.contains("controller") || path.ends_with(".controller.ts")
}

/// Applies the DTO naming policy to a resolved return type name.
///
/// Primitives are rejected first; then `*Dto`/`*Response`/`*Entity`,
/// anything mentioning `Promise` or `Array`, `T[]` and capitalized
/// identifiers are accepted.
#[must_use]
pub fn is_valid_return_type(name: &str) -> bool {
    if PRIMITIVE_TYPES.iter().any(|p| name.eq_ignore_ascii_case(p)) {
        return false;
    }
    if name.ends_with("Dto") || name.ends_with("Response") || name.ends_with("Entity") {
        return true;
    }
    if name.contains("Promise") {
        return true;
    }
    if name.contains("Array") || name.ends_with("[]") {
        return true;
    }

    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Resolves a `return_type` annotation to the name the policy judges.
///
/// Named types resolve to their name. The listed primitives resolve to their
/// keyword. Other keywords resolve to a tag such as `ObjectKeyword`, and any
/// other shape to its PascalCase node kind (`UnionType`, `TupleType`).
fn resolve_return_type(annotation: TsNode<'_>) -> String {
    if annotation.kind() != "type_annotation" {
        return kind_tag(annotation.kind());
    }
    let Some(ty) = annotation.first_child() else {
        return kind_tag(annotation.kind());
    };

    match ty.kind() {
        "type_identifier" | "array_type" => ty.text().to_string(),
        "predefined_type" => {
            let keyword = ty.text();
            if PRIMITIVE_TYPES.contains(&keyword) {
                keyword.to_string()
            } else {
                format!("{}Keyword", to_pascal_case(keyword))
            }
        }
        "generic_type" | "nested_type_identifier" => ty
            .field("name")
            .map_or_else(|| kind_tag(ty.kind()), |n| n.text().to_string()),
        other => kind_tag(other),
    }
}

/// `union_type` becomes `UnionType`.
fn kind_tag(kind: &str) -> String {
    to_pascal_case(kind)
}

fn is_controller_class(class: TsNode<'_>) -> bool {
    let mut decorators = class.children_of_kind("decorator");
    if let Some(export) = class.parent().filter(|p| p.kind() == "export_statement") {
        decorators.extend(export.children_of_kind("decorator"));
    }
    decorators
        .into_iter()
        .any(|d| decorator_name(d) == Some("Controller"))
}

/// Decorators may hang off the method itself or precede it in the class body.
fn is_route_handler(method: TsNode<'_>) -> bool {
    let mut decorators = method.children_of_kind("decorator");
    let mut prev = method.prev_named_sibling();
    while let Some(node) = prev.filter(|n| n.kind() == "decorator") {
        decorators.push(node);
        prev = node.prev_named_sibling();
    }
    decorators
        .into_iter()
        .filter_map(decorator_name)
        .any(|name| HTTP_DECORATORS.contains(&name))
}

/// `@Name(...)` and `@Name` both yield `Name`.
fn decorator_name(decorator: TsNode<'_>) -> Option<&str> {
    let expr = decorator.first_child()?;
    match expr.kind() {
        "identifier" => Some(expr.text()),
        "call_expression" => expr
            .field("function")
            .filter(|f| f.kind() == "identifier")
            .map(|f| f.text()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn check_source(source: &str) -> Vec<Finding> {
        let mut file = tempfile::Builder::new()
            .prefix("Users.controller")
            .suffix(".ts")
            .tempfile()
            .unwrap();
        file.write_all(source.as_bytes()).unwrap();
        ControllerReturnType::new()
            .check(&FileContext::new(file.path()))
            .unwrap()
    }

    fn controller(methods: &str) -> String {
        format!("@Controller('users')\nexport class UsersController {{\n{methods}\n}}\n")
    }

    #[test]
    fn non_controller_files_are_not_read() {
        let ctx = FileContext::new(Path::new("src/users/UserService.ts"));
        assert!(ControllerReturnType::new().check(&ctx).unwrap().is_empty());
    }

    #[test]
    fn missing_return_type_is_one_error() {
        let findings = check_source(&controller("  @Get()\n  findAll() {\n    return [];\n  }"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("'findAll'"));
        assert!(findings[0].message.contains("must declare a return type"));
    }

    #[test]
    fn primitive_return_type_is_an_error() {
        let findings = check_source(&controller(
            "  @Post()\n  create(): string {\n    return 'created';\n  }",
        ));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'string'"));
        assert_eq!(findings[0].line, Some(4));
    }

    #[test]
    fn dto_return_types_pass() {
        let findings = check_source(&controller(
            "  @Get(':id')\n  findOne(): IUserDto {\n    return null;\n  }\n\n  @Get()\n  async findAll(): Promise<IUserDto[]> {\n    return [];\n  }",
        ));
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn promise_on_sync_method_is_a_warning() {
        let findings = check_source(&controller(
            "  @Get()\n  findAll(): Promise<IUserDto[]> {\n    return Promise.resolve([]);\n  }",
        ));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("not marked async"));
    }

    #[test]
    fn void_and_unknown_are_rejected() {
        let findings = check_source(&controller(
            "  @Delete(':id')\n  remove(): void {}\n\n  @Patch()\n  update(): unknown {\n    return null;\n  }",
        ));
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("'void'"));
        assert!(findings[1].message.contains("'unknown'"));
    }

    #[test]
    fn composite_and_keyword_types_resolve_to_tags() {
        let findings = check_source(&controller(
            "  @Get()\n  one(): UserDto | null {\n    return null;\n  }\n\n  @Get()\n  both(): UserDto & Extra {\n    return null;\n  }\n\n  @Get()\n  pair(): [UserDto, number] {\n    return null;\n  }\n\n  @Get()\n  raw(): object {\n    return {};\n  }",
        ));
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[test]
    fn annotation_tags() {
        assert_eq!(kind_tag("union_type"), "UnionType");
        assert_eq!(kind_tag("intersection_type"), "IntersectionType");
        assert!(is_valid_return_type(&kind_tag("tuple_type")));
    }

    #[test]
    fn undecorated_and_non_route_methods_are_ignored() {
        let source = "export class UsersController {\n  @Get()\n  findAll() {}\n}\n\n@Controller()\nexport class OtherController {\n  helper() {}\n  @UseGuards(AuthGuard)\n  guarded() {}\n}\n";
        assert!(check_source(source).is_empty());
    }

    #[test]
    fn bare_controller_decorator_counts() {
        let source = "@Controller\nclass UsersController {\n  @Head()\n  ping() {}\n}\n";
        let findings = check_source(source);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'ping'"));
    }

    #[test]
    fn malformed_source_uses_pattern_fallback() {
        let source = "@Controller('bad')\nexport class BadController {\n  @Get()\n  findAll() {\n    return [;\n  }\n\n  @Post()\n  create(): string {\n    return 'x';\n  }\n";
        let findings = check_source(source);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'findAll'"));
        assert_eq!(findings[0].line, Some(3));
        assert_eq!(findings[0].column, None);
    }

    #[test]
    fn fallback_sees_same_line_decorators() {
        let source = "class X {\n  @Get() async list() {\n  }\n  broken(;\n}\n";
        let findings = check_source(source);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("'list'"));
    }

    #[test]
    fn return_type_policy() {
        for valid in ["UserDto", "CreateUserResponse", "UserEntity", "Promise", "Array", "UserDto[]", "User"] {
            assert!(is_valid_return_type(valid), "{valid}");
        }
        for invalid in ["string", "Number", "any", "unknown", "void", "union_type", "user"] {
            assert!(!is_valid_return_type(invalid), "{invalid}");
        }
    }
}
