//! Shared per-run context handed to every check.

use crate::error::LintError;
use crate::layout::{LayoutResolver, PackageLayout};
use crate::pyproject::PyProject;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a check needs about the repository under inspection.
///
/// Built once per run; checks consume it read-only. `layout` is `None` when
/// the package directory could not be located; checks must then degrade to
/// silent success or a single warning.
#[derive(Debug)]
pub struct CheckContext {
    /// Repository root the run was pointed at.
    pub repo_root: PathBuf,
    /// Parsed `pyproject.toml`, when one exists.
    pub pyproject: Option<PyProject>,
    /// Discovered package layout, when discovery succeeded.
    pub layout: Option<PackageLayout>,
}

impl CheckContext {
    /// Discovers the package under `repo_root`.
    ///
    /// # Errors
    ///
    /// Fails only on the linter's own plumbing (unreadable or invalid
    /// `pyproject.toml`); an absent package is not an error.
    pub fn discover(repo_root: impl Into<PathBuf>) -> Result<Self, LintError> {
        let repo_root = repo_root.into();
        let pyproject = PyProject::load(&repo_root)?;
        let layout = LayoutResolver::new().resolve(&repo_root, pyproject.as_ref());
        if layout.is_none() {
            debug!("package discovery failed for {}", repo_root.display());
        }
        Ok(Self {
            repo_root,
            pyproject,
            layout,
        })
    }

    /// Builds a context directly from parts. Test seam.
    #[must_use]
    pub fn new(
        repo_root: impl Into<PathBuf>,
        pyproject: Option<PyProject>,
        layout: Option<PackageLayout>,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            pyproject,
            layout,
        }
    }

    /// Returns `path` relative to the repository root, for stable report
    /// text regardless of where the run was invoked from.
    #[must_use]
    pub fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.repo_root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}
