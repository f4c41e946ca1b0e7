//! Error types for the linting framework.
//!
//! Findings in *inspected* code are never errors here; they flow through
//! [`crate::CheckResult`]. This enum covers the linter's own plumbing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the linting framework itself.
#[derive(Debug, Error)]
pub enum LintError {
    /// Failed to read a file the linter needs.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// `pyproject.toml` exists but is not valid TOML.
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        /// Path of the offending TOML file.
        path: PathBuf,
        /// Underlying TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The tree-sitter Python grammar could not be loaded.
    #[error("tree-sitter language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// An inspected file has invalid Python syntax.
    ///
    /// Checks catch this variant and downgrade it to a skip or a warning;
    /// it never aborts a run.
    #[error("{path}: syntax error")]
    Syntax {
        /// Path of the unparsable file.
        path: PathBuf,
    },
}

impl LintError {
    /// Wraps an IO error with the path it occurred on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for the parse-failure variant.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}
