//! Check that the `Pdk(...)` constructor is called with the expected
//! keyword arguments and wires cells through `get_cells()`.

use pdk_lint_core::aliases::{import_aliases, resolve, AliasMap};
use pdk_lint_core::layout::py_files;
use pdk_lint_core::matchers::assignment_targets;
use pdk_lint_core::parse::{named_children, node_line, node_text, ParsedFile};
use pdk_lint_core::{Check, CheckContext, CheckResult, Location};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tree_sitter::Node;

/// Check name for pdk-object.
pub const NAME: &str = "check-pdk-object";

/// Keyword arguments every `Pdk()` call must pass.
pub const REQUIRED_KWARGS: &[&str] = &["name", "cells", "layers", "cross_sections"];

/// Keyword arguments a `Pdk()` call should pass.
pub const RECOMMENDED_KWARGS: &[&str] = &["layer_views", "layer_stack", "routing_strategies"];

/// Name of the designated cell-discovery factory.
pub const CELLS_FACTORY: &str = "get_cells";

/// Validates `Pdk()` constructor calls across the package.
#[derive(Debug, Clone)]
pub struct PdkObject {
    required: &'static [&'static str],
    recommended: &'static [&'static str],
}

impl Default for PdkObject {
    fn default() -> Self {
        Self::new()
    }
}

impl PdkObject {
    /// Creates the check with the default kwarg sets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required: REQUIRED_KWARGS,
            recommended: RECOMMENDED_KWARGS,
        }
    }

    fn check_file(&self, ctx: &CheckContext, file: &ParsedFile, result: &mut CheckResult) -> bool {
        let source = file.bytes();
        let aliases = import_aliases(file);
        let factory_vars = factory_assigned_vars(file);
        let display = ctx.display_path(&file.path);

        let mut found_any = false;
        for call in find_calls(file.root()) {
            let Some(function) = call.child_by_field_name("function") else {
                continue;
            };
            if !is_pdk_constructor(function, source, &aliases) {
                continue;
            }
            found_any = true;
            let line = node_line(call);

            let kwargs = keyword_argument_names(call, source);

            let missing: Vec<&str> = self
                .required
                .iter()
                .copied()
                .filter(|k| !kwargs.contains(*k))
                .collect();
            if !missing.is_empty() {
                let mut missing = missing;
                missing.sort_unstable();
                result.error_at(
                    Location::with_line(display.clone(), line),
                    format!("Pdk() missing required kwargs: {missing:?}"),
                );
            }

            let missing_rec: Vec<&str> = self
                .recommended
                .iter()
                .copied()
                .filter(|k| !kwargs.contains(*k))
                .collect();
            if !missing_rec.is_empty() {
                let mut missing_rec = missing_rec;
                missing_rec.sort_unstable();
                result.warn_at(
                    Location::with_line(display.clone(), line),
                    format!("Pdk() missing recommended kwargs: {missing_rec:?}"),
                );
            }

            if let Some(value) = keyword_argument_value(call, source, "cells") {
                if !is_factory_value(value, source, line, &factory_vars) {
                    result.warn_at(
                        Location::with_line(display.clone(), line),
                        "Pdk(cells=...) should use get_cells() for dynamic cell discovery",
                    );
                }
            }
        }
        found_any
    }
}

impl Check for PdkObject {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Validates Pdk() constructor kwargs and get_cells() usage"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            result.warn("could not locate package directory - skipping");
            return result;
        };

        let mut found_any_pdk = false;
        for subdir in layout.subdirs() {
            let mut candidates: Vec<PathBuf> = vec![subdir.join("__init__.py")];
            candidates.extend(py_files(subdir));
            let pdk_subdir = subdir.join("pdk");
            if pdk_subdir.is_dir() {
                candidates.extend(py_files(&pdk_subdir));
            }

            let mut seen = BTreeSet::new();
            for path in candidates {
                if !path.exists() || !seen.insert(path.clone()) {
                    continue;
                }
                match pdk_lint_core::parse::parse_file(&path) {
                    Ok(file) => {
                        if self.check_file(ctx, &file, &mut result) {
                            found_any_pdk = true;
                        }
                    }
                    Err(e) if e.is_syntax() => {
                        result.warn_at(
                            Location::new(ctx.display_path(&path)),
                            "could not parse (syntax error)",
                        );
                    }
                    Err(_) => {}
                }
            }
        }

        if !found_any_pdk {
            result.error("no Pdk() constructor call found in any package file");
        }

        result
    }
}

/// All call expressions in the tree, in document order.
fn find_calls(root: Node<'_>) -> Vec<Node<'_>> {
    let mut calls = Vec::new();
    collect_calls(root, &mut calls);
    calls
}

fn collect_calls<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    if node.kind() == "call" {
        out.push(node);
    }
    for child in named_children(node) {
        collect_calls(child, out);
    }
}

/// Recognizes the constructor by literal name, alias resolution, or
/// attribute suffix.
fn is_pdk_constructor(function: Node<'_>, source: &[u8], aliases: &AliasMap) -> bool {
    match function.kind() {
        "identifier" => {
            let name = node_text(function, source);
            name == "Pdk" || resolve(aliases, name).contains("Pdk")
        }
        "attribute" => function
            .child_by_field_name("attribute")
            .is_some_and(|a| node_text(a, source) == "Pdk"),
        _ => false,
    }
}

/// Keyword-argument names of a call; splatted `**kwargs` contribute nothing.
fn keyword_argument_names(call: Node<'_>, source: &[u8]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    if let Some(arguments) = call.child_by_field_name("arguments") {
        for arg in named_children(arguments) {
            if arg.kind() == "keyword_argument" {
                if let Some(name) = arg.child_by_field_name("name") {
                    names.insert(node_text(name, source).to_string());
                }
            }
        }
    }
    names
}

fn keyword_argument_value<'a>(call: Node<'a>, source: &[u8], name: &str) -> Option<Node<'a>> {
    let arguments = call.child_by_field_name("arguments")?;
    named_children(arguments)
        .into_iter()
        .filter(|a| a.kind() == "keyword_argument")
        .find(|a| {
            a.child_by_field_name("name")
                .is_some_and(|n| node_text(n, source) == name)
        })
        .and_then(|a| a.child_by_field_name("value"))
}

/// Module-level variables assigned from `get_cells(...)` calls, with the
/// line of their first such assignment.
///
/// Only assignments that textually precede the constructor call count;
/// forward references (assignment after use) are not resolved.
fn factory_assigned_vars(file: &ParsedFile) -> BTreeMap<String, usize> {
    let source = file.bytes();
    let mut vars = BTreeMap::new();
    for node in named_children(file.root()) {
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
        if !right.is_some_and(|r| is_factory_call(r, source)) {
            continue;
        }
        for left in targets {
            if left.kind() == "identifier" {
                vars.entry(node_text(left, source).to_string())
                    .or_insert_with(|| node_line(node));
            }
        }
    }
    vars
}

fn is_factory_call(node: Node<'_>, source: &[u8]) -> bool {
    if node.kind() != "call" {
        return false;
    }
    let Some(function) = node.child_by_field_name("function") else {
        return false;
    };
    match function.kind() {
        "identifier" => node_text(function, source) == CELLS_FACTORY,
        "attribute" => function
            .child_by_field_name("attribute")
            .is_some_and(|a| node_text(a, source) == CELLS_FACTORY),
        _ => false,
    }
}

/// The `cells=` value must be a factory call, or a variable assigned from
/// one on an earlier line.
fn is_factory_value(
    value: Node<'_>,
    source: &[u8],
    call_line: usize,
    factory_vars: &BTreeMap<String, usize>,
) -> bool {
    if is_factory_call(value, source) {
        return true;
    }
    value.kind() == "identifier"
        && factory_vars
            .get(node_text(value, source))
            .is_some_and(|assigned| *assigned < call_line)
}
