//! Context-sensitive syntax matchers shared by the checks.
//!
//! Everything here is alias-aware string matching over the CST; there is no
//! type inference. Decorator and annotation usage varies across aliasing
//! styles, so literal-name matching alone would under-detect.

use crate::aliases::{resolve, AliasMap};
use crate::parse::{children_by_field, named_children, node_line, node_text, string_value};
use std::collections::BTreeMap;
use tree_sitter::Node;

/// Substring identifying the component-design framework in resolved paths.
pub const FRAMEWORK_TOKEN: &str = "gdsfactory";

/// Conventional short alias for the framework.
pub const FRAMEWORK_SHORT_ALIAS: &str = "gf";

/// Name of the cell-factory decorator.
pub const CELL_DECORATOR: &str = "cell";

/// Name of the framework's component type.
pub const COMPONENT_TYPE: &str = "Component";

/// Top-level function definitions with their decorator expressions.
///
/// Decorated definitions are unwrapped; plain definitions come back with an
/// empty decorator list.
#[must_use]
pub fn top_level_functions(root: Node<'_>) -> Vec<(Node<'_>, Vec<Node<'_>>)> {
    let mut out = Vec::new();
    for node in named_children(root) {
        match node.kind() {
            "function_definition" => out.push((node, Vec::new())),
            "decorated_definition" => {
                let Some(def) = node.child_by_field_name("definition") else {
                    continue;
                };
                if def.kind() != "function_definition" {
                    continue;
                }
                let decorators = named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "decorator")
                    .filter_map(|d| d.named_child(0))
                    .collect();
                out.push((def, decorators));
            }
            _ => {}
        }
    }
    out
}

/// Returns true when a decorator expression is the framework cell decorator.
///
/// Accepts `@gf.cell`, `@gf.cell(...)`, an attribute whose base resolves into
/// the framework, a bare name resolving to `<framework>…cell`, and the two
/// conventional bare spellings `cell` / `_cell`.
#[must_use]
pub fn is_cell_decorator(decorator: Node<'_>, source: &[u8], aliases: &AliasMap) -> bool {
    // Unwrap call-style decorators: @gf.cell(autoname=True)
    let node = if decorator.kind() == "call" {
        match decorator.child_by_field_name("function") {
            Some(f) => f,
            None => return false,
        }
    } else {
        decorator
    };

    match node.kind() {
        "attribute" => {
            let Some(attr) = node.child_by_field_name("attribute") else {
                return false;
            };
            if node_text(attr, source) != CELL_DECORATOR {
                return false;
            }
            let Some(object) = node.child_by_field_name("object") else {
                return false;
            };
            if object.kind() != "identifier" {
                return false;
            }
            let name = node_text(object, source);
            resolve(aliases, name).contains(FRAMEWORK_TOKEN) || name == FRAMEWORK_SHORT_ALIAS
        }
        "identifier" => {
            let name = node_text(node, source);
            let resolved = aliases.get(name).map(String::as_str).unwrap_or("");
            if resolved.contains(FRAMEWORK_TOKEN) && resolved.contains(CELL_DECORATOR) {
                return true;
            }
            name == "cell" || name == "_cell"
        }
        _ => false,
    }
}

/// Returns true when a function's return annotation names the framework
/// component type: attribute form, bare-name form, or a string forward
/// reference containing the type name.
#[must_use]
pub fn returns_component(func_def: Node<'_>, source: &[u8], aliases: &AliasMap) -> bool {
    let Some(return_type) = func_def.child_by_field_name("return_type") else {
        return false;
    };
    // The grammar wraps the annotation expression in a `type` node.
    let Some(ann) = return_type.named_child(0) else {
        return false;
    };

    match ann.kind() {
        "attribute" => {
            let Some(attr) = ann.child_by_field_name("attribute") else {
                return false;
            };
            if node_text(attr, source) != COMPONENT_TYPE {
                return false;
            }
            let Some(object) = ann.child_by_field_name("object") else {
                return false;
            };
            if object.kind() != "identifier" {
                return false;
            }
            let name = node_text(object, source);
            resolve(aliases, name).contains(FRAMEWORK_TOKEN) || name == FRAMEWORK_SHORT_ALIAS
        }
        "identifier" => {
            let name = node_text(ann, source);
            let resolved = aliases.get(name).map(String::as_str).unwrap_or("");
            name.contains(COMPONENT_TYPE) && resolved.contains(FRAMEWORK_TOKEN)
        }
        "string" => string_value(ann, source).is_some_and(|s| s.contains(COMPONENT_TYPE)),
        _ => false,
    }
}

/// Extracts the docstring of a function or class definition.
#[must_use]
pub fn docstring(def_node: Node<'_>, source: &[u8]) -> Option<String> {
    let body = def_node.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    string_value(first.named_child(0)?, source)
}

/// Returns true when a docstring carries a Google-style `Args:` section.
#[must_use]
pub fn has_args_section(doc: &str) -> bool {
    doc.lines().any(|line| line.trim() == "Args:")
}

/// Positional parameter names of a function, excluding `self`.
#[must_use]
pub fn param_names(func_def: Node<'_>, source: &[u8]) -> Vec<String> {
    let Some(params) = func_def.child_by_field_name("parameters") else {
        return Vec::new();
    };
    named_children(params)
        .into_iter()
        .filter_map(|p| match p.kind() {
            "identifier" => Some(node_text(p, source).to_string()),
            "typed_parameter" => p
                .named_child(0)
                .filter(|c| c.kind() == "identifier")
                .map(|c| node_text(c, source).to_string()),
            "default_parameter" | "typed_default_parameter" => p
                .child_by_field_name("name")
                .map(|c| node_text(c, source).to_string()),
            _ => None,
        })
        .filter(|name| name != "self")
        .collect()
}

/// Detects a top-level `if __name__ == "__main__":` guard, either operand
/// order.
#[must_use]
pub fn has_main_guard(root: Node<'_>, source: &[u8]) -> bool {
    named_children(root).into_iter().any(|node| {
        node.kind() == "if_statement"
            && node
                .child_by_field_name("condition")
                .is_some_and(|cond| is_main_comparison(cond, source))
    })
}

fn is_main_comparison(cond: Node<'_>, source: &[u8]) -> bool {
    if cond.kind() != "comparison_operator" {
        return false;
    }
    let mut has_eq = false;
    for i in 0..cond.child_count() {
        if let Some(child) = cond.child(i) {
            if child.kind() == "==" {
                has_eq = true;
            }
        }
    }
    let operands = named_children(cond);
    if !has_eq || operands.len() != 2 {
        return false;
    }

    let is_name = |n: Node<'_>| n.kind() == "identifier" && node_text(n, source) == "__name__";
    let is_main =
        |n: Node<'_>| string_value(n, source).is_some_and(|s| s == "__main__");

    (is_name(operands[0]) && is_main(operands[1]))
        || (is_name(operands[1]) && is_main(operands[0]))
}

/// Flattens a possibly chained assignment (`a = b = value`) into its
/// target nodes and the final right-hand expression.
///
/// The grammar nests each further target inside the `right` field, so a
/// chain is a ladder of `assignment` nodes.
#[must_use]
pub fn assignment_targets(expr: Node<'_>) -> (Vec<Node<'_>>, Option<Node<'_>>) {
    let mut targets = Vec::new();
    let mut node = expr;
    loop {
        if let Some(left) = node.child_by_field_name("left") {
            targets.push(left);
        }
        match node.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" => node = right,
            right => return (targets, right),
        }
    }
}

/// All names bound at module top level, with their lines: simple, chained
/// and annotated assignments, class and function definitions, and imports.
#[must_use]
pub fn top_level_defined_names(root: Node<'_>, source: &[u8]) -> BTreeMap<String, usize> {
    let mut found = BTreeMap::new();

    for node in named_children(root) {
        let line = node_line(node);
        match node.kind() {
            "expression_statement" => {
                let Some(expr) = node.named_child(0) else {
                    continue;
                };
                if expr.kind() == "assignment" {
                    let (targets, _) = assignment_targets(expr);
                    for left in targets {
                        if left.kind() == "identifier" {
                            found.insert(node_text(left, source).to_string(), line);
                        }
                    }
                }
            }
            "class_definition" | "function_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    found.insert(node_text(name, source).to_string(), line);
                }
            }
            "decorated_definition" => {
                if let Some(name) = node
                    .child_by_field_name("definition")
                    .and_then(|d| d.child_by_field_name("name"))
                {
                    found.insert(node_text(name, source).to_string(), line);
                }
            }
            "import_statement" | "import_from_statement" => {
                for name in children_by_field(node, "name") {
                    match name.kind() {
                        "dotted_name" => {
                            found.insert(node_text(name, source).to_string(), line);
                        }
                        "aliased_import" => {
                            if let Some(alias) = name.child_by_field_name("alias") {
                                found.insert(node_text(alias, source).to_string(), line);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    found
}

/// Top-level assignments to `name`, as `(line, right-hand node)` pairs.
///
/// Chained assignments count for every target; the right-hand node is the
/// final value expression of the chain.
#[must_use]
pub fn assignments_to<'a>(root: Node<'a>, source: &[u8], name: &str) -> Vec<(usize, Option<Node<'a>>)> {
    let mut out = Vec::new();
    for node in named_children(root) {
        if node.kind() != "expression_statement" {
            continue;
        }
        let Some(expr) = node.named_child(0) else {
            continue;
        };
        if expr.kind() != "assignment" {
            continue;
        }
        let (targets, right) = assignment_targets(expr);
        if targets
            .iter()
            .any(|t| t.kind() == "identifier" && node_text(*t, source) == name)
        {
            out.push((node_line(node), right));
        }
    }
    out
}

/// String value of a top-level `name = "literal"` assignment, if any.
#[must_use]
pub fn assigned_string(root: Node<'_>, source: &[u8], name: &str) -> Option<String> {
    assignments_to(root, source, name)
        .into_iter()
        .filter_map(|(_, right)| right)
        .find_map(|right| string_value(right, source))
}
