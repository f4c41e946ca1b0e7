//! Check that each technology module (`tech.py`) declares the expected
//! names, and that the layer listing file agrees with the layer class.

use pdk_lint_core::matchers::top_level_defined_names;
use pdk_lint_core::parse::{named_children, node_text, ParsedFile};
use pdk_lint_core::{Check, CheckContext, CheckResult, Location};
use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::Node;

/// Check name for tech-structure.
pub const NAME: &str = "check-tech-structure";

/// Names every `tech.py` must bind at top level.
pub const REQUIRED_NAMES: &[&str] = &["LAYER", "LAYER_STACK", "LAYER_VIEWS", "cross_sections"];

/// Names every `tech.py` should bind at top level.
pub const RECOMMENDED_NAMES: &[&str] = &["routing_strategies"];

/// Marker substring identifying the layer-map class.
const LAYER_CLASS_MARKER: &str = "LAYER";

/// Validates technology-declaration files per package subdirectory.
#[derive(Debug, Clone)]
pub struct TechStructure {
    required: &'static [&'static str],
    recommended: &'static [&'static str],
}

impl Default for TechStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl TechStructure {
    /// Creates the check with the default name sets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required: REQUIRED_NAMES,
            recommended: RECOMMENDED_NAMES,
        }
    }

    fn check_tech_file(&self, display: &Path, file: &ParsedFile, result: &mut CheckResult) {
        let defined = top_level_defined_names(file.root(), file.bytes());

        for name in self.required {
            if !defined.contains_key(*name) {
                result.error_at(
                    Location::new(display.to_path_buf()),
                    format!("required definition '{name}' not found"),
                );
            }
        }
        for name in self.recommended {
            if !defined.contains_key(*name) {
                result.warn_at(
                    Location::new(display.to_path_buf()),
                    format!("recommended definition '{name}' not found"),
                );
            }
        }
    }
}

impl Check for TechStructure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Validates tech.py declarations and layers.yaml consistency"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            result.warn("could not locate package directory - skipping");
            return result;
        };

        for subdir in layout.subdirs() {
            let tech_path = subdir.join("tech.py");
            if !tech_path.exists() {
                result.error_at(Location::new(ctx.display_path(subdir)), "tech.py not found");
                continue;
            }
            match pdk_lint_core::parse::parse_file(&tech_path) {
                Ok(file) => {
                    self.check_tech_file(&ctx.display_path(&tech_path), &file, &mut result);
                }
                Err(e) if e.is_syntax() => {
                    result.warn_at(
                        Location::new(ctx.display_path(&tech_path)),
                        "could not parse (syntax error)",
                    );
                }
                Err(_) => {}
            }
            check_layer_drift(ctx, subdir, &mut result);
        }

        result
    }
}

/// Cross-checks `layers.yaml` keys against the layer-map class, when both
/// exist. Drift in either direction is tolerated but surfaced.
fn check_layer_drift(ctx: &CheckContext, subdir: &Path, result: &mut CheckResult) {
    let yaml_path = ["layers.yaml", "layers.yml"]
        .iter()
        .map(|n| subdir.join(n))
        .find(|p| p.exists());
    let Some(yaml_path) = yaml_path else {
        return;
    };
    let Ok(content) = std::fs::read_to_string(&yaml_path) else {
        return;
    };

    let yaml_layers = top_level_keys(&content);

    let mut code_layers = BTreeSet::new();
    for src_name in ["layers.py", "tech.py"] {
        let src_path = subdir.join(src_name);
        if !src_path.exists() {
            continue;
        }
        let Ok(file) = pdk_lint_core::parse::parse_file(&src_path) else {
            continue;
        };
        collect_layer_class_names(file.root(), file.bytes(), &mut code_layers);
    }
    if code_layers.is_empty() {
        return;
    }

    let only_in_code: Vec<&String> = code_layers.difference(&yaml_layers).collect();
    let only_in_yaml: Vec<&String> = yaml_layers.difference(&code_layers).collect();
    let display = ctx.display_path(subdir);

    if !only_in_code.is_empty() {
        result.warn_at(
            Location::new(display.clone()),
            format!("layers in code but not in layers.yaml: {only_in_code:?}"),
        );
    }
    if !only_in_yaml.is_empty() {
        result.warn_at(
            Location::new(display),
            format!("layers in layers.yaml but not in code: {only_in_yaml:?}"),
        );
    }
}

/// Top-level keys of a flat key-value listing: lines starting with a word
/// followed by a colon. Deliberately not a YAML parse; the listing is flat
/// by convention and nested keys are indented out of consideration.
fn top_level_keys(content: &str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for line in content.lines() {
        let word: String = line
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if word.is_empty() {
            continue;
        }
        if line[word.len()..].trim_start().starts_with(':') {
            keys.insert(word);
        }
    }
    keys
}

/// Names bound inside any class whose name contains the layer marker,
/// found anywhere in the tree.
fn collect_layer_class_names(node: Node<'_>, source: &[u8], out: &mut BTreeSet<String>) {
    if node.kind() == "class_definition" {
        let is_layer_class = node
            .child_by_field_name("name")
            .is_some_and(|n| node_text(n, source).to_uppercase().contains(LAYER_CLASS_MARKER));
        if is_layer_class {
            if let Some(body) = node.child_by_field_name("body") {
                for stmt in named_children(body) {
                    if stmt.kind() != "expression_statement" {
                        continue;
                    }
                    let Some(expr) = stmt.named_child(0) else {
                        continue;
                    };
                    if expr.kind() != "assignment" {
                        continue;
                    }
                    if let Some(left) = expr.child_by_field_name("left") {
                        if left.kind() == "identifier" {
                            out.insert(node_text(left, source).to_string());
                        }
                    }
                }
            }
        }
    }
    for child in named_children(node) {
        collect_layer_class_names(child, source, out);
    }
}
