//! Check cell function conventions and cell module re-exports.
//!
//! Public cell functions must carry the framework cell decorator, document
//! themselves, and be re-exported from `cells/__init__.py` when the package
//! uses a cells directory.

use pdk_lint_core::aliases::{import_aliases, AliasMap};
use pdk_lint_core::matchers::{
    docstring, has_args_section, is_cell_decorator, param_names, returns_component,
    top_level_functions,
};
use pdk_lint_core::parse::{
    children_by_field, named_children, node_line, node_text, parse_file, ParsedFile,
};
use pdk_lint_core::{Check, CheckContext, CheckResult, Location};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Check name for cells-structure.
pub const NAME: &str = "check-cells-structure";

/// Validates decorator usage, docstrings, and `cells/__init__.py` exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellsStructure;

impl CellsStructure {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for CellsStructure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Validates cell decorators, docstrings, and cells/ re-exports"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            result.warn("could not locate package directory - skipping");
            return result;
        };

        for subdir in layout.subdirs() {
            let cells_dir = subdir.join("cells");
            let cells_py = subdir.join("cells.py");

            if cells_dir.is_dir() {
                let cell_files: Vec<PathBuf> = pdk_lint_core::layout::py_files(&cells_dir)
                    .into_iter()
                    .filter(|p| p.file_name().is_some_and(|n| n != "__init__.py"))
                    .collect();
                for cell_file in &cell_files {
                    check_one_file(ctx, cell_file, &mut result);
                }
                let cells_init = cells_dir.join("__init__.py");
                if cells_init.exists() && !cell_files.is_empty() {
                    check_init_exports(ctx, &cells_init, &cell_files, &mut result);
                }
            } else if cells_py.exists() {
                check_one_file(ctx, &cells_py, &mut result);
            } else {
                result.error_at(
                    Location::new(ctx.display_path(subdir)),
                    "no cells module found (expected cells/ or cells.py)",
                );
            }
        }

        result
    }
}

fn check_one_file(ctx: &CheckContext, path: &Path, result: &mut CheckResult) {
    let display = ctx.display_path(path);
    match parse_file(path) {
        Ok(file) => {
            let aliases = import_aliases(&file);
            check_functions(&file, &aliases, &display, result);
        }
        Err(e) if e.is_syntax() => {
            result.warn_at(Location::new(display), "could not parse (syntax error)");
        }
        Err(_) => {
            result.warn_at(Location::new(display), "could not read file");
        }
    }
}

fn check_functions(file: &ParsedFile, aliases: &AliasMap, display: &Path, result: &mut CheckResult) {
    let source = file.bytes();
    for (func, decorators) in top_level_functions(file.root()) {
        let Some(name_node) = func.child_by_field_name("name") else {
            continue;
        };
        let name = node_text(name_node, source);
        if name.starts_with('_') {
            continue;
        }
        let line = node_line(func);
        let has_cell_dec = decorators
            .iter()
            .any(|d| is_cell_decorator(*d, source, aliases));

        if has_cell_dec {
            match docstring(func, source) {
                None => {
                    result.error_at(
                        Location::with_line(display, line),
                        format!("cell function '{name}' missing docstring"),
                    );
                }
                Some(doc) => {
                    // Only documented-parameter enforcement when there are
                    // parameters to document.
                    if !param_names(func, source).is_empty() && !has_args_section(&doc) {
                        result.error_at(
                            Location::with_line(display, line),
                            format!("cell function '{name}' docstring missing 'Args:' section"),
                        );
                    }
                }
            }
        } else if returns_component(func, source, aliases) {
            result.error_at(
                Location::with_line(display, line),
                format!("function '{name}' returns Component but missing the cell decorator"),
            );
        }
    }
}

/// Module stems imported at the top level of `cells/__init__.py`.
///
/// A relative `from .mod import ...` exports `mod`; a plain `import mod`
/// exports the final dotted component.
fn exported_module_stems(file: &ParsedFile) -> BTreeSet<String> {
    let source = file.bytes();
    let mut stems = BTreeSet::new();
    for node in named_children(file.root()) {
        match node.kind() {
            "import_from_statement" => {
                let Some(module) = node.child_by_field_name("module_name") else {
                    continue;
                };
                if module.kind() == "relative_import" {
                    for part in named_children(module) {
                        if part.kind() == "dotted_name" {
                            let text = node_text(part, source);
                            if let Some(first) = text.split('.').next() {
                                stems.insert(first.to_string());
                            }
                        }
                    }
                }
            }
            "import_statement" => {
                for name in children_by_field(node, "name") {
                    let target = match name.kind() {
                        "aliased_import" => name.child_by_field_name("name"),
                        _ => Some(name),
                    };
                    if let Some(target) = target {
                        let text = node_text(target, source);
                        if let Some(last) = text.split('.').next_back() {
                            stems.insert(last.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }
    stems
}

fn check_init_exports(
    ctx: &CheckContext,
    cells_init: &Path,
    cell_files: &[PathBuf],
    result: &mut CheckResult,
) {
    let Ok(file) = parse_file(cells_init) else {
        return;
    };
    let exported = exported_module_stems(&file);
    let display = ctx.display_path(cells_init);
    for cell_file in cell_files {
        let Some(stem) = cell_file.file_stem().map(|s| s.to_string_lossy()) else {
            continue;
        };
        if !exported.contains(stem.as_ref()) {
            result.error_at(
                Location::new(display.clone()),
                format!("cell module '{stem}' is not re-exported (missing import from .{stem})"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdk_lint_core::LayoutResolver;
    use std::fs;
    use tempfile::TempDir;

    fn run_on(repo: &TempDir) -> CheckResult {
        let layout = LayoutResolver::new().resolve(repo.path(), None);
        let ctx = CheckContext::new(repo.path(), None, layout);
        CellsStructure::new().run(&ctx)
    }

    fn write(repo: &TempDir, rel: &str, content: &str) {
        let path = repo.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const GOOD_CELL: &str = "\
import gdsfactory as gf

@gf.cell
def straight(length: float = 10.0) -> gf.Component:
    \"\"\"A straight waveguide.

    Args:
        length: waveguide length in um.
    \"\"\"
    return gf.Component()
";

    #[test]
    fn documented_decorated_cell_is_clean() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/cells/__init__.py", "from .straight import straight\n");
        write(&repo, "mypdk/cells/straight.py", GOOD_CELL);
        assert!(run_on(&repo).is_clean());
    }

    #[test]
    fn missing_docstring_is_an_error_with_line() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/cells/__init__.py", "from .bend import bend\n");
        write(
            &repo,
            "mypdk/cells/bend.py",
            "import gdsfactory as gf\n\n@gf.cell\ndef bend(radius=10):\n    return gf.Component()\n",
        );
        let result = run_on(&repo);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "cell function 'bend' missing docstring");
        assert_eq!(errors[0].location.as_ref().unwrap().line, Some(4));
    }

    #[test]
    fn params_require_args_section() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(
            &repo,
            "mypdk/cells.py",
            "import gdsfactory as gf\n\n@gf.cell\ndef taper(w1, w2):\n    \"\"\"A taper.\"\"\"\n    return gf.Component()\n",
        );
        let result = run_on(&repo);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("missing 'Args:' section"));
    }

    #[test]
    fn no_params_means_no_args_section_needed() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(
            &repo,
            "mypdk/cells.py",
            "import gdsfactory as gf\n\n@gf.cell\ndef marker():\n    \"\"\"A marker.\"\"\"\n    return gf.Component()\n",
        );
        assert!(run_on(&repo).is_clean());
    }

    #[test]
    fn component_return_without_decorator_is_an_error() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(
            &repo,
            "mypdk/cells.py",
            "from gdsfactory import Component\n\ndef ring(radius) -> Component:\n    \"\"\"A ring.\n\n    Args:\n        radius: um.\n    \"\"\"\n    return Component()\n",
        );
        let result = run_on(&repo);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .message
            .contains("returns Component but missing the cell decorator"));
    }

    #[test]
    fn private_functions_are_skipped() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(
            &repo,
            "mypdk/cells.py",
            "import gdsfactory as gf\n\ndef _helper(x) -> gf.Component:\n    return gf.Component()\n",
        );
        assert!(run_on(&repo).is_clean());
    }

    #[test]
    fn missing_cells_module_is_an_error_per_subdir() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/tech.py", "");
        let result = run_on(&repo);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "no cells module found (expected cells/ or cells.py)"
        );
    }

    #[test]
    fn unexported_cell_module_is_an_error() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/cells/__init__.py", "from .straight import straight\n");
        write(&repo, "mypdk/cells/straight.py", GOOD_CELL);
        write(&repo, "mypdk/cells/bend.py", GOOD_CELL);
        let result = run_on(&repo);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "cell module 'bend' is not re-exported (missing import from .bend)"
        );
    }

    #[test]
    fn plain_import_satisfies_the_re_export() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/cells/__init__.py", "import mypdk.cells.straight\n");
        write(&repo, "mypdk/cells/straight.py", GOOD_CELL);
        assert!(run_on(&repo).is_clean());
    }

    #[test]
    fn wildcard_relative_import_satisfies_the_re_export() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/cells/__init__.py", "from .straight import *\n");
        write(&repo, "mypdk/cells/straight.py", GOOD_CELL);
        assert!(run_on(&repo).is_clean());
    }

    #[test]
    fn unparsable_cell_file_is_a_warning() {
        let repo = TempDir::new().unwrap();
        write(&repo, "mypdk/__init__.py", "");
        write(&repo, "mypdk/cells.py", "def broken(:\n");
        let result = run_on(&repo);
        assert!(!result.has_errors());
        assert_eq!(result.warnings().count(), 1);
    }
}
