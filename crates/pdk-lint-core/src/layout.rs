//! Repository structure discovery: package directory, bands, cell files.
//!
//! All enumeration is lexicographically ordered so repeated runs against
//! unchanged input produce byte-identical findings.

use crate::pyproject::PyProject;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory names never considered as the package during the fallback scan.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "tests",
    "docs",
    "notebooks",
    ".git",
    ".github",
    "actions",
    "hooks",
    "scripts",
];

/// Resolved package layout for one run.
#[derive(Debug, Clone)]
pub struct PackageLayout {
    /// The package directory.
    pub root: PathBuf,
    /// Band subdirectories, lexicographic; empty for flat packages.
    pub bands: Vec<PathBuf>,
}

impl PackageLayout {
    /// Returns true when the package has two or more bands.
    #[must_use]
    pub fn is_multi_band(&self) -> bool {
        self.bands.len() >= 2
    }

    /// The directories downstream checks treat as comparable units: the
    /// bands when any exist, else the package root itself.
    #[must_use]
    pub fn subdirs(&self) -> Vec<&Path> {
        if self.bands.is_empty() {
            vec![self.root.as_path()]
        } else {
            self.bands.iter().map(PathBuf::as_path).collect()
        }
    }

    /// All cell source files: root files first, then per band in band order.
    ///
    /// For each unit, `cells/*.py` (minus `__init__.py`) when the directory
    /// exists, else a flat `cells.py` when present.
    #[must_use]
    pub fn cell_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_cells(&self.root, &mut files);
        for band in &self.bands {
            collect_cells(band, &mut files);
        }
        files
    }
}

fn collect_cells(base: &Path, out: &mut Vec<PathBuf>) {
    let cells_dir = base.join("cells");
    if cells_dir.is_dir() {
        out.extend(
            py_files(&cells_dir)
                .into_iter()
                .filter(|p| p.file_name().is_some_and(|n| n != "__init__.py")),
        );
    } else if base.join("cells.py").exists() {
        out.push(base.join("cells.py"));
    }
}

/// Locates the package directory and its bands.
///
/// Skip-name sets are injected at construction; the resolver holds no
/// mutable state.
#[derive(Debug, Clone)]
pub struct LayoutResolver {
    skip_dirs: &'static [&'static str],
}

impl Default for LayoutResolver {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS,
        }
    }
}

type Strategy = fn(&LayoutResolver, &Path, Option<&PyProject>) -> Option<PathBuf>;

impl LayoutResolver {
    /// Creates a resolver with the default skip set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locates the package directory under `repo_root`.
    ///
    /// Three independent strategies run in order; the first success wins.
    /// `None` means "no standard layout" and callers must degrade to a skip
    /// or a single warning, never a hard error.
    #[must_use]
    pub fn locate_package(&self, repo_root: &Path, pyproject: Option<&PyProject>) -> Option<PathBuf> {
        let strategies: [Strategy; 3] = [
            Self::from_setuptools_include,
            Self::from_project_name,
            Self::scan_top_level,
        ];
        let found = strategies
            .iter()
            .find_map(|strategy| strategy(self, repo_root, pyproject));
        match &found {
            Some(pkg) => debug!("package directory: {}", pkg.display()),
            None => debug!("no package directory found under {}", repo_root.display()),
        }
        found
    }

    /// Locates the package and enumerates its bands.
    #[must_use]
    pub fn resolve(&self, repo_root: &Path, pyproject: Option<&PyProject>) -> Option<PackageLayout> {
        let root = self.locate_package(repo_root, pyproject)?;
        let bands = find_band_dirs(&root);
        Some(PackageLayout { root, bands })
    }

    /// Strategy 1: `[tool.setuptools.packages.find].include`, taking the
    /// shortest entry with no wildcard and no dot.
    fn from_setuptools_include(
        &self,
        repo_root: &Path,
        pyproject: Option<&PyProject>,
    ) -> Option<PathBuf> {
        let (base, include) = pyproject?.packages_find();
        let name = include
            .iter()
            .filter(|i| !i.contains('*') && !i.contains('.'))
            .min_by_key(|i| i.len())?;
        accept_package(repo_root.join(base).join(name))
    }

    /// Strategy 2: normalized `[project].name` (hyphens to underscores,
    /// lower-cased).
    fn from_project_name(&self, repo_root: &Path, pyproject: Option<&PyProject>) -> Option<PathBuf> {
        let pyproject = pyproject?;
        let name = pyproject.project_name()?;
        if name.is_empty() {
            return None;
        }
        let (base, _) = pyproject.packages_find();
        let normalized = name.replace('-', "_").to_lowercase();
        accept_package(repo_root.join(base).join(normalized))
    }

    /// Strategy 3: lexicographic scan of top-level directories, skipping the
    /// configured non-package names and dot-prefixed names.
    fn scan_top_level(&self, repo_root: &Path, _pyproject: Option<&PyProject>) -> Option<PathBuf> {
        sorted_dirs(repo_root)
            .into_iter()
            .filter(|d| {
                let name = dir_name(d);
                !self.skip_dirs.contains(&name.as_str()) && !name.starts_with('.')
            })
            .find(|d| has_init(d))
    }
}

fn accept_package(candidate: PathBuf) -> Option<PathBuf> {
    (candidate.is_dir() && has_init(&candidate)).then_some(candidate)
}

/// Direct subdirectories of `pkg` that look like technology bands: not
/// dot/underscore-prefixed, with `__init__.py` and a cells module or a
/// `tech.py`. Lexicographic order.
#[must_use]
pub fn find_band_dirs(pkg: &Path) -> Vec<PathBuf> {
    sorted_dirs(pkg)
        .into_iter()
        .filter(|d| {
            let name = dir_name(d);
            if name.starts_with('_') || name.starts_with('.') {
                return false;
            }
            if !has_init(d) {
                return false;
            }
            let has_cells = d.join("cells").is_dir() || d.join("cells.py").exists();
            has_cells || d.join("tech.py").exists()
        })
        .collect()
}

/// Returns true when the directory carries an `__init__.py`.
#[must_use]
pub fn has_init(dir: &Path) -> bool {
    dir.join("__init__.py").exists()
}

/// Direct `*.py` files in a directory, lexicographically sorted.
#[must_use]
pub fn py_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "py"))
        .collect();
    files.sort();
    files
}

fn sorted_dirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
