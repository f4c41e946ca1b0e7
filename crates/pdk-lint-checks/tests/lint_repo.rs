//! End-to-end runs of the built-in check set against fixture repositories.
//!
//! Fixtures are built on the fly with `tempfile` so each test owns its
//! repository tree.

use pdk_lint_checks::all_checks;
use pdk_lint_core::{RunSummary, Runner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn lint(repo: &TempDir) -> RunSummary {
    Runner::builder()
        .root(repo.path())
        .checks(all_checks())
        .build()
        .run()
        .expect("run should not fail on fixture repos")
}

const PYPROJECT: &str = "[project]\nname = \"mypdk\"\n";

const COMPLIANT_INIT: &str = r#"from gdsfactory import Pdk
from gdsfactory.get_factories import get_cells

from mypdk import cells, tech
from mypdk.tech import LAYER, LAYER_STACK, LAYER_VIEWS, cross_sections, routing_strategies

__version__ = "0.1.0"
__all__ = ["PDK", "LAYER", "cells", "tech"]

PDK = Pdk(
    name="mypdk",
    cells=get_cells([cells]),
    layers=LAYER,
    cross_sections=cross_sections,
    layer_views=LAYER_VIEWS,
    layer_stack=LAYER_STACK,
    routing_strategies=routing_strategies,
)
"#;

const COMPLIANT_TECH: &str = r#"class LAYER:
    WG = (1, 0)
    SLAB = (2, 0)

LAYER_STACK = {"WG": 220}
LAYER_VIEWS = {"WG": "waveguide"}

def cross_sections():
    return {}

routing_strategies = {"route_bundle": None}
"#;

const COMPLIANT_CELLS: &str = r#"import gdsfactory as gf

from mypdk.tech import LAYER


@gf.cell
def straight(length: float = 10.0) -> gf.Component:
    """A straight waveguide.

    Args:
        length: waveguide length in um.
    """
    c = gf.Component()
    c.add_polygon([(0.0, 0.0), (length, 0.0)], layer=LAYER.WG)
    return c
"#;

/// A flat single-band repository that satisfies every built-in check.
fn compliant_repo() -> TempDir {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "pyproject.toml", PYPROJECT);
    write(repo.path(), "mypdk/__init__.py", COMPLIANT_INIT);
    write(repo.path(), "mypdk/tech.py", COMPLIANT_TECH);
    write(repo.path(), "mypdk/cells.py", COMPLIANT_CELLS);
    repo
}

#[test]
fn compliant_repo_is_silent_with_exit_zero() {
    let repo = compliant_repo();
    let summary = lint(&repo);
    assert_eq!(
        summary.render(),
        "",
        "clean repos must produce no output, got:\n{}",
        summary.render()
    );
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let repo = compliant_repo();
    write(
        repo.path(),
        "mypdk/cells.py",
        "import gdsfactory as gf\n\n@gf.cell\ndef bad() -> gf.Component:\n    return gf.Component(layer=(1, 0))\n",
    );
    let first = lint(&repo).render();
    let second = lint(&repo).render();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn raw_layer_keyword_tuple_is_one_error_with_values_and_line() {
    let repo = compliant_repo();
    write(
        repo.path(),
        "mypdk/cells.py",
        "import gdsfactory as gf\n\n@gf.cell\ndef bad():\n    \"\"\"Bad cell.\"\"\"\n    c = gf.Component()\n    c.add_polygon([(0.0, 0.0)], layer=(1, 0))\n    return c\n",
    );
    let summary = lint(&repo);
    let layer_errors: Vec<_> = summary
        .results
        .iter()
        .flat_map(|r| r.errors())
        .filter(|f| f.message.contains("raw layer tuple"))
        .collect();
    assert_eq!(layer_errors.len(), 1);
    assert_eq!(
        layer_errors[0].message,
        "raw layer tuple (1, 0) - use a named LAYER constant instead"
    );
    assert_eq!(
        layer_errors[0].location.as_ref().unwrap().line,
        Some(7),
        "error must point at the add_polygon line"
    );
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn size_keyword_tuple_is_not_a_layer() {
    let repo = compliant_repo();
    write(
        repo.path(),
        "mypdk/cells.py",
        "import gdsfactory as gf\n\nfrom mypdk.tech import LAYER\n\n@gf.cell\ndef pad():\n    \"\"\"A pad.\"\"\"\n    c = gf.Component()\n    c.add_ref(gf.components.rectangle(size=(100, 100), layer=LAYER.WG))\n    return c\n",
    );
    let summary = lint(&repo);
    assert!(summary
        .results
        .iter()
        .flat_map(|r| r.findings.iter())
        .all(|f| !f.message.contains("raw layer tuple")));
}

#[test]
fn aliased_framework_decorator_is_recognized() {
    let repo = compliant_repo();
    // Non-standard alias plus a bare imported decorator name.
    write(
        repo.path(),
        "mypdk/cells.py",
        "import gdsfactory as fw\nfrom gdsfactory import cell\n\n@fw.cell\ndef one():\n    \"\"\"One.\"\"\"\n    return fw.Component()\n\n@cell\ndef two():\n    \"\"\"Two.\"\"\"\n    return fw.Component()\n",
    );
    let summary = lint(&repo);
    // Both functions carry the decorator and a docstring, so cells-structure
    // reports nothing for them.
    assert!(summary
        .results
        .iter()
        .find(|r| r.check == "check-cells-structure")
        .unwrap()
        .is_clean());
}

#[test]
fn single_missing_kwarg_lists_only_itself() {
    let repo = compliant_repo();
    write(
        repo.path(),
        "mypdk/__init__.py",
        "from gdsfactory import Pdk\nfrom gdsfactory.get_factories import get_cells\nfrom mypdk import cells\n\n__version__ = \"0.1.0\"\n__all__ = [\"PDK\"]\n\nPDK = Pdk(\n    name=\"mypdk\",\n    cells=get_cells([cells]),\n    cross_sections={},\n    layer_views=None,\n    layer_stack=None,\n    routing_strategies=None,\n)\n",
    );
    let summary = lint(&repo);
    let pdk_errors: Vec<_> = summary
        .results
        .iter()
        .find(|r| r.check == "check-pdk-object")
        .unwrap()
        .errors()
        .map(|f| f.message.clone())
        .collect();
    assert_eq!(pdk_errors, ["Pdk() missing required kwargs: [\"layers\"]"]);
}

#[test]
fn syntax_errors_never_abort_the_run() {
    let repo = compliant_repo();
    write(repo.path(), "mypdk/cells.py", "def broken(:\n");
    write(repo.path(), "mypdk/tech.py", "class LAYER(:\n");
    let summary = lint(&repo);
    // Parse failures surface as warnings, never as errors or Err.
    assert_eq!(summary.exit_code(), 0);
    let warnings: Vec<_> = summary
        .results
        .iter()
        .flat_map(|r| r.warnings())
        .filter(|f| f.message.contains("syntax error"))
        .collect();
    assert!(!warnings.is_empty());
}

#[test]
fn warnings_alone_keep_exit_zero_but_render_output() {
    let repo = compliant_repo();
    // Drop the recommended routing_strategies from tech.py.
    write(
        repo.path(),
        "mypdk/tech.py",
        "class LAYER:\n    WG = (1, 0)\n\nLAYER_STACK = {}\nLAYER_VIEWS = {}\n\ndef cross_sections():\n    return {}\n",
    );
    // And from the Pdk call.
    write(
        repo.path(),
        "mypdk/__init__.py",
        "from gdsfactory import Pdk\nfrom gdsfactory.get_factories import get_cells\nfrom mypdk import cells\n\n__version__ = \"0.1.0\"\n__all__ = [\"PDK\"]\n\nPDK = Pdk(\n    name=\"mypdk\",\n    cells=get_cells([cells]),\n    layers=None,\n    cross_sections={},\n    layer_views=None,\n    layer_stack=None,\n)\n",
    );
    let summary = lint(&repo);
    assert_eq!(summary.exit_code(), 0);
    let rendered = summary.render();
    assert!(rendered.contains("warnings:"));
    assert!(rendered.contains("0 error(s) found"));
}

#[test]
fn multi_band_repo_reports_band_drift() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "pyproject.toml", PYPROJECT);
    write(repo.path(), "mypdk/__init__.py", COMPLIANT_INIT);
    for band in ["cband", "oband"] {
        write(repo.path(), &format!("mypdk/{band}/__init__.py"), "");
        write(
            repo.path(),
            &format!("mypdk/{band}/cells.py"),
            COMPLIANT_CELLS,
        );
    }
    write(repo.path(), "mypdk/cband/tech.py", COMPLIANT_TECH);

    let summary = lint(&repo);
    let multi = summary
        .results
        .iter()
        .find(|r| r.check == "check-multi-band")
        .unwrap();
    assert!(multi
        .errors()
        .any(|f| f.message == "missing tech.py"
            && f.location.as_ref().unwrap().file.ends_with("oband")));
    assert!(multi
        .warnings()
        .any(|f| f.message.contains("cband has_tech=true but oband has_tech=false")));
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn empty_repo_degrades_to_warnings_only() {
    let repo = TempDir::new().unwrap();
    let summary = lint(&repo);
    assert_eq!(summary.exit_code(), 0);
    // Discovery-dependent checks either skip silently or warn once.
    for result in &summary.results {
        assert!(!result.has_errors(), "{} errored", result.check);
    }
}
