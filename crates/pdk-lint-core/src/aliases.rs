//! Per-file import alias resolution.
//!
//! Builds a flat mapping from local identifiers to fully-qualified dotted
//! paths, from top-level import statements only. Imports nested inside
//! functions or classes are invisible by design, star imports contribute
//! nothing, and relative-import dots are dropped. This is deliberately
//! heuristic; matchers only ever substring-match the resolved paths.

use crate::parse::{children_by_field, named_children, node_text, ParsedFile};
use std::collections::BTreeMap;
use tree_sitter::Node;

/// Local identifier -> fully-qualified dotted import path.
pub type AliasMap = BTreeMap<String, String>;

/// Builds the alias map for one parsed file.
///
/// `import gdsfactory as gf` maps `gf -> gdsfactory`;
/// `from gdsfactory import cell` maps `cell -> gdsfactory.cell`.
#[must_use]
pub fn import_aliases(file: &ParsedFile) -> AliasMap {
    let source = file.bytes();
    let mut aliases = AliasMap::new();

    for node in named_children(file.root()) {
        match node.kind() {
            "import_statement" => collect_plain_import(node, source, &mut aliases),
            "import_from_statement" => collect_from_import(node, source, &mut aliases),
            _ => {}
        }
    }

    aliases
}

fn collect_plain_import(node: Node<'_>, source: &[u8], aliases: &mut AliasMap) {
    for name in children_by_field(node, "name") {
        match name.kind() {
            "dotted_name" => {
                let path = node_text(name, source);
                aliases.insert(path.to_string(), path.to_string());
            }
            "aliased_import" => {
                if let (Some(target), Some(alias)) = (
                    name.child_by_field_name("name"),
                    name.child_by_field_name("alias"),
                ) {
                    aliases.insert(
                        node_text(alias, source).to_string(),
                        node_text(target, source).to_string(),
                    );
                }
            }
            _ => {}
        }
    }
}

fn collect_from_import(node: Node<'_>, source: &[u8], aliases: &mut AliasMap) {
    let module = node
        .child_by_field_name("module_name")
        .map(|m| module_path(m, source))
        .unwrap_or_default();

    for name in children_by_field(node, "name") {
        let (target, local) = match name.kind() {
            "dotted_name" => {
                let text = node_text(name, source);
                (text, text)
            }
            "aliased_import" => {
                let (Some(t), Some(a)) = (
                    name.child_by_field_name("name"),
                    name.child_by_field_name("alias"),
                ) else {
                    continue;
                };
                (node_text(t, source), node_text(a, source))
            }
            // `from m import *` resolves nothing.
            _ => continue,
        };

        let qualified = if module.is_empty() {
            target.to_string()
        } else {
            format!("{module}.{target}")
        };
        aliases.insert(local.to_string(), qualified);
    }
}

/// Extracts the dotted module path, dropping any relative-import level dots.
fn module_path(node: Node<'_>, source: &[u8]) -> String {
    match node.kind() {
        "dotted_name" => node_text(node, source).to_string(),
        "relative_import" => named_children(node)
            .into_iter()
            .find(|c| c.kind() == "dotted_name")
            .map(|c| node_text(c, source).to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Resolves a local name through the alias map, defaulting to the name itself.
#[must_use]
pub fn resolve<'a>(aliases: &'a AliasMap, name: &'a str) -> &'a str {
    aliases.get(name).map_or(name, String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_source;

    fn aliases_of(src: &str) -> AliasMap {
        let file = parse_source("test.py", src.to_string()).unwrap();
        import_aliases(&file)
    }

    #[test]
    fn plain_import_with_alias() {
        let map = aliases_of("import gdsfactory as gf\n");
        assert_eq!(map.get("gf").map(String::as_str), Some("gdsfactory"));
    }

    #[test]
    fn plain_import_without_alias() {
        let map = aliases_of("import gdsfactory.components\n");
        assert_eq!(
            map.get("gdsfactory.components").map(String::as_str),
            Some("gdsfactory.components")
        );
    }

    #[test]
    fn from_import() {
        let map = aliases_of("from gdsfactory import cell\n");
        assert_eq!(map.get("cell").map(String::as_str), Some("gdsfactory.cell"));
    }

    #[test]
    fn from_import_with_alias() {
        let map = aliases_of("from gdsfactory.typings import Component as C\n");
        assert_eq!(
            map.get("C").map(String::as_str),
            Some("gdsfactory.typings.Component")
        );
    }

    #[test]
    fn relative_import_level_is_dropped() {
        let map = aliases_of("from ..tech import LAYER\n");
        assert_eq!(map.get("LAYER").map(String::as_str), Some("tech.LAYER"));
    }

    #[test]
    fn bare_relative_import() {
        let map = aliases_of("from . import cells\n");
        assert_eq!(map.get("cells").map(String::as_str), Some("cells"));
    }

    #[test]
    fn star_import_contributes_nothing() {
        let map = aliases_of("from gdsfactory.components import *\n");
        assert!(map.is_empty());
    }

    #[test]
    fn nested_imports_are_invisible() {
        let map = aliases_of("def f():\n    import gdsfactory as gf\n");
        assert!(map.is_empty());
    }

    #[test]
    fn resolve_defaults_to_identity() {
        let map = aliases_of("import gdsfactory as gf\n");
        assert_eq!(resolve(&map, "gf"), "gdsfactory");
        assert_eq!(resolve(&map, "unknown"), "unknown");
    }
}
