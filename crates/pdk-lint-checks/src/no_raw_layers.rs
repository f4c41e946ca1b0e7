//! Check that cell code uses named layer constants, not raw `(int, int)`
//! tuples.
//!
//! # Rationale
//!
//! Ad hoc layer tuples bypass the technology's layer map and silently drift
//! when layer numbers change. Cell code should reference `LAYER.XXX`
//! constants defined in the technology module.

use pdk_lint_core::parse::{named_children, node_line, node_text, ParsedFile};
use pdk_lint_core::{Check, CheckContext, CheckResult, Location};
use tree_sitter::Node;

/// Check name for no-raw-layers.
pub const NAME: &str = "check-no-raw-layers";

/// Keyword-argument names that always carry layers.
pub const LAYER_KEYWORDS: &[&str] = &["layer", "layers"];

/// Files that legitimately define layer constants; never walked.
pub const LAYER_SOURCE_FILES: &[&str] = &["tech.py", "layers.py", "config.py"];

/// Flags two-element all-integer literal tuples used as ad hoc layer
/// identifiers in cell files.
#[derive(Debug, Clone)]
pub struct NoRawLayers {
    layer_keywords: &'static [&'static str],
    exempt_files: &'static [&'static str],
}

impl Default for NoRawLayers {
    fn default() -> Self {
        Self::new()
    }
}

impl NoRawLayers {
    /// Creates the check with the default keyword and exemption sets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layer_keywords: LAYER_KEYWORDS,
            exempt_files: LAYER_SOURCE_FILES,
        }
    }
}

impl Check for NoRawLayers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids raw (int, int) layer tuples in cell code"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            return result;
        };

        for cell_file in layout.cell_files() {
            let name = cell_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.exempt_files.contains(&name.as_str()) {
                continue;
            }

            let display = ctx.display_path(&cell_file);
            match pdk_lint_core::parse::parse_file(&cell_file) {
                Ok(file) => {
                    for tuple in find_raw_tuples(&file, self.layer_keywords) {
                        result.error_at(
                            Location::with_line(display.clone(), tuple.line),
                            format!(
                                "raw layer tuple ({}, {}) - use a named LAYER constant instead",
                                tuple.a, tuple.b
                            ),
                        );
                    }
                }
                Err(e) if e.is_syntax() => {
                    result.warn_at(Location::new(display), "could not parse (syntax error)");
                }
                Err(_) => {
                    result.warn_at(Location::new(display), "could not read file");
                }
            }
        }

        result
    }
}

/// One flagged tuple, with its literal values.
#[derive(Debug, PartialEq, Eq)]
struct RawTuple {
    line: usize,
    a: String,
    b: String,
}

/// Immutable traversal context, threaded through the descent.
///
/// Scoping: `keyword` is set for exactly the value subtree of a keyword
/// argument. Positional arguments keep the surrounding context, so an outer
/// keyword still applies through nested calls, and one argument's keyword
/// never leaks to a sibling.
#[derive(Debug, Clone, Copy, Default)]
struct TupleContext<'a> {
    in_default: bool,
    in_class_body: bool,
    keyword: Option<&'a str>,
}

fn find_raw_tuples(file: &ParsedFile, layer_keywords: &[&str]) -> Vec<RawTuple> {
    let mut hits = Vec::new();
    walk(
        file.root(),
        file.bytes(),
        TupleContext::default(),
        layer_keywords,
        &mut hits,
    );
    hits
}

fn walk<'a>(
    node: Node<'a>,
    source: &'a [u8],
    ctx: TupleContext<'a>,
    layer_keywords: &[&str],
    hits: &mut Vec<RawTuple>,
) {
    match node.kind() {
        "function_definition" => {
            // Parameter defaults commonly reference already-resolved layer
            // specs; tuples there are allowed.
            if let Some(params) = node.child_by_field_name("parameters") {
                for param in named_children(params) {
                    if matches!(param.kind(), "default_parameter" | "typed_default_parameter") {
                        if let Some(value) = param.child_by_field_name("value") {
                            let in_default = TupleContext {
                                in_default: true,
                                ..ctx
                            };
                            walk(value, source, in_default, layer_keywords, hits);
                        }
                    }
                }
            }
            if let Some(body) = node.child_by_field_name("body") {
                walk(body, source, ctx, layer_keywords, hits);
            }
        }
        "decorated_definition" => {
            // Decorator expressions are not usage sites.
            if let Some(def) = node.child_by_field_name("definition") {
                walk(def, source, ctx, layer_keywords, hits);
            }
        }
        "class_definition" => {
            // Tuples in a class body are declarations, not usages.
            if let Some(body) = node.child_by_field_name("body") {
                let in_class = TupleContext {
                    in_class_body: true,
                    ..ctx
                };
                walk(body, source, in_class, layer_keywords, hits);
            }
        }
        "call" => {
            if let Some(function) = node.child_by_field_name("function") {
                walk(function, source, ctx, layer_keywords, hits);
            }
            if let Some(arguments) = node.child_by_field_name("arguments") {
                for arg in named_children(arguments) {
                    if arg.kind() == "keyword_argument" {
                        let name = arg
                            .child_by_field_name("name")
                            .map(|n| node_text(n, source));
                        if let Some(value) = arg.child_by_field_name("value") {
                            let in_keyword = TupleContext {
                                keyword: name,
                                ..ctx
                            };
                            walk(value, source, in_keyword, layer_keywords, hits);
                        }
                    } else {
                        walk(arg, source, ctx, layer_keywords, hits);
                    }
                }
            }
        }
        "tuple" => {
            if !ctx.in_default && !ctx.in_class_body {
                if let Some((a, b)) = int_pair(node, source) {
                    if flagged_by_keyword(ctx.keyword, layer_keywords) {
                        hits.push(RawTuple {
                            line: node_line(node),
                            a,
                            b,
                        });
                    }
                }
            }
            for child in named_children(node) {
                walk(child, source, ctx, layer_keywords, hits);
            }
        }
        _ => {
            for child in named_children(node) {
                walk(child, source, ctx, layer_keywords, hits);
            }
        }
    }
}

/// A tuple with no keyword context is flagged too, the conservative
/// default.
fn flagged_by_keyword(keyword: Option<&str>, layer_keywords: &[&str]) -> bool {
    match keyword {
        None => true,
        Some(k) => {
            layer_keywords.contains(&k) || k.ends_with("_layer") || k.ends_with("_layers")
        }
    }
}

fn int_pair(node: Node<'_>, source: &[u8]) -> Option<(String, String)> {
    let elements = named_children(node);
    if elements.len() != 2 || !elements.iter().all(|e| e.kind() == "integer") {
        return None;
    }
    Some((
        node_text(elements[0], source).to_string(),
        node_text(elements[1], source).to_string(),
    ))
}
