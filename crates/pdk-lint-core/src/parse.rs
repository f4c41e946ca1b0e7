//! Python parsing via tree-sitter, plus node helpers shared by matchers.

use crate::error::LintError;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// One parsed Python file.
///
/// Built per file and discarded once its matchers have run. A file whose
/// parse tree contains ERROR nodes never becomes a `ParsedFile`; callers get
/// [`LintError::Syntax`] and decide how to degrade.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path the source was read from.
    pub path: PathBuf,
    /// Full file contents.
    pub source: String,
    tree: Tree,
}

impl ParsedFile {
    /// Returns the module root node.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the source as bytes, for `Node::utf8_text`.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }
}

/// Parses Python source text.
///
/// # Errors
///
/// Returns [`LintError::Syntax`] when the grammar reports errors, and
/// [`LintError::Language`] if the Python grammar cannot be loaded.
pub fn parse_source(path: impl Into<PathBuf>, source: String) -> Result<ParsedFile, LintError> {
    let path = path.into();
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into())?;

    let tree = parser
        .parse(&source, None)
        .ok_or_else(|| LintError::Syntax { path: path.clone() })?;
    if tree.root_node().has_error() {
        return Err(LintError::Syntax { path });
    }

    Ok(ParsedFile { path, source, tree })
}

/// Reads and parses a Python file from disk.
///
/// # Errors
///
/// Returns [`LintError::Io`] when the file cannot be read, otherwise as
/// [`parse_source`].
pub fn parse_file(path: &Path) -> Result<ParsedFile, LintError> {
    let source = std::fs::read_to_string(path).map_err(|e| LintError::io(path, e))?;
    parse_source(path, source)
}

/// Returns the text of a node, or `""` on invalid UTF-8.
#[must_use]
pub fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Returns the 1-indexed start line of a node.
#[must_use]
pub fn node_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Collects the named children of a node.
#[must_use]
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Collects the children of a node bound to a grammar field.
#[must_use]
pub fn children_by_field<'a>(node: Node<'a>, field: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Returns the value of a string literal node, without quotes or prefixes.
///
/// Escape sequences are kept verbatim; the callers only substring-match.
#[must_use]
pub fn string_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut out = String::new();
    for child in named_children(node) {
        match child.kind() {
            "string_content" | "escape_sequence" => out.push_str(node_text(child, source)),
            _ => {}
        }
    }
    Some(out)
}

/// Returns true if the node is an integer literal.
#[must_use]
pub fn is_integer(node: Node<'_>) -> bool {
    node.kind() == "integer"
}
