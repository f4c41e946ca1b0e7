//! Core types for findings and per-check results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Soft convention mismatch; reported but never fails a run.
    Warning,
    /// Structural violation; forces a nonzero exit.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location of a finding.
///
/// The line is optional: structural findings ("tech.py not found") point at
/// a file or directory without any particular line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the offending file or directory, relative to the repo root.
    pub file: PathBuf,
    /// Line number (1-indexed) when the finding points into a parsed file.
    pub line: Option<usize>,
}

impl Location {
    /// Creates a location without a line number.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    /// Creates a location with a line number.
    #[must_use]
    pub fn with_line(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file.display()),
            None => write!(f, "{}", self.file.display()),
        }
    }
}

/// One reported deviation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Severity of this finding.
    pub severity: Severity,
    /// Where the deviation was found, if it maps to a path at all.
    pub location: Option<Location>,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(severity: Severity, location: Option<Location>, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}: {loc}: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Ordered findings for one check run.
///
/// Insertion order is preserved; `has_errors` alone decides the exit status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check that produced these findings.
    pub check: String,
    /// All findings, in insertion order.
    pub findings: Vec<Finding>,
}

impl CheckResult {
    /// Creates an empty result for the named check.
    #[must_use]
    pub fn new(check: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            findings: Vec::new(),
        }
    }

    /// Records an error with no source location.
    pub fn error(&mut self, message: impl Into<String>) {
        self.findings
            .push(Finding::new(Severity::Error, None, message));
    }

    /// Records an error at a location.
    pub fn error_at(&mut self, location: Location, message: impl Into<String>) {
        self.findings
            .push(Finding::new(Severity::Error, Some(location), message));
    }

    /// Records a warning with no source location.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.findings
            .push(Finding::new(Severity::Warning, None, message));
    }

    /// Records a warning at a location.
    pub fn warn_at(&mut self, location: Location, message: impl Into<String>) {
        self.findings
            .push(Finding::new(Severity::Warning, Some(location), message));
    }

    /// Returns true if at least one error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Returns true if no findings were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns the error-level findings, in insertion order.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    /// Returns the warning-level findings, in insertion order.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Exit code contract: 1 iff at least one error, warnings never fail.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Renders the report text.
    ///
    /// Zero findings render as an empty string (low-noise contract). Any
    /// findings render a header naming the check and its error count, the
    /// errors, then the warnings under their own heading.
    #[must_use]
    pub fn render(&self) -> String {
        use std::fmt::Write;

        if self.is_clean() {
            return String::new();
        }

        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "  {}: {} error(s) found", self.check, self.errors().count());
        let _ = writeln!(out, "{rule}");
        for finding in self.errors() {
            let _ = writeln!(out, "  {finding}");
        }
        if self.warnings().count() > 0 {
            let _ = writeln!(out, "  warnings:");
            for finding in self.warnings() {
                let _ = writeln!(out, "  {finding}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_result_is_silent_and_passes() {
        let result = CheckResult::new("check-tech-structure");
        assert!(result.render().is_empty());
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn warnings_alone_do_not_fail() {
        let mut result = CheckResult::new("check-tech-structure");
        result.warn("recommended definition 'routing_strategies' not found");
        assert!(!result.has_errors());
        assert_eq!(result.exit_code(), 0);
        let rendered = result.render();
        assert!(rendered.contains("0 error(s) found"));
        assert!(rendered.contains("warnings:"));
        assert!(rendered.contains("routing_strategies"));
    }

    #[test]
    fn errors_force_nonzero_exit() {
        let mut result = CheckResult::new("check-pdk-object");
        result.error_at(
            Location::with_line("mypdk/pdk.py", 12),
            "Pdk() missing required kwargs: [\"layers\"]",
        );
        result.warn("something soft");
        assert_eq!(result.exit_code(), 1);
        let rendered = result.render();
        assert!(rendered.contains("check-pdk-object: 1 error(s) found"));
        assert!(rendered.contains("error: mypdk/pdk.py:12: Pdk() missing"));
        assert!(rendered.contains("warnings:"));
    }

    #[test]
    fn errors_render_before_warnings_regardless_of_insertion() {
        let mut result = CheckResult::new("check-cells-structure");
        result.warn("first inserted");
        result.error("second inserted");
        let rendered = result.render();
        let err_pos = rendered.find("error: second").unwrap();
        let warn_pos = rendered.find("warning: first").unwrap();
        assert!(err_pos < warn_pos);
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::with_line("a/b.py", 3).to_string(), "a/b.py:3");
        assert_eq!(Location::new("a/b.py").to_string(), "a/b.py");
    }
}
