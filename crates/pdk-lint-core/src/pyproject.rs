//! Read-only view over `pyproject.toml` layout hints.

use crate::error::LintError;
use std::path::{Path, PathBuf};

/// Parsed `pyproject.toml`, exposing only the fields package discovery needs.
#[derive(Debug, Clone)]
pub struct PyProject {
    doc: toml::Value,
}

impl PyProject {
    /// Loads `<repo_root>/pyproject.toml`, returning `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Io`] on read failure and [`LintError::Toml`] on
    /// invalid TOML.
    pub fn load(repo_root: &Path) -> Result<Option<Self>, LintError> {
        let path = repo_root.join("pyproject.toml");
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path).map_err(|e| LintError::io(&path, e))?;
        let doc = toml::from_str(&text).map_err(|source| LintError::Toml {
            path: path.clone(),
            source,
        })?;
        Ok(Some(Self { doc }))
    }

    /// Builds a view from already-parsed TOML. Test seam.
    #[must_use]
    pub fn from_value(doc: toml::Value) -> Self {
        Self { doc }
    }

    /// `[project].name`, if declared.
    #[must_use]
    pub fn project_name(&self) -> Option<&str> {
        self.doc.get("project")?.get("name")?.as_str()
    }

    /// `[tool.setuptools.packages.find]` hints: the `where` base directory
    /// and the `include` entries.
    #[must_use]
    pub fn packages_find(&self) -> (PathBuf, Vec<String>) {
        let find = self
            .doc
            .get("tool")
            .and_then(|v| v.get("setuptools"))
            .and_then(|v| v.get("packages"))
            .and_then(|v| v.get("find"));

        let base = find
            .and_then(|f| f.get("where"))
            .and_then(toml::Value::as_array)
            .and_then(|a| a.first())
            .and_then(toml::Value::as_str)
            .map_or_else(|| PathBuf::from("."), PathBuf::from);

        let include = find
            .and_then(|f| f.get("include"))
            .and_then(toml::Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(toml::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        (base, include)
    }
}
