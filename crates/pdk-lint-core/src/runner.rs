//! Orchestration: run a set of checks against one repository.

use crate::check::CheckBox;
use crate::context::CheckContext;
use crate::error::LintError;
use crate::types::CheckResult;
use std::path::PathBuf;
use tracing::{debug, info};

/// Builder for configuring a [`Runner`].
#[derive(Default)]
pub struct RunnerBuilder {
    root: Option<PathBuf>,
    checks: Vec<CheckBox>,
}

impl RunnerBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repository root (default: current directory).
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Registers a check. Checks run in registration order.
    #[must_use]
    pub fn check<C: crate::check::Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Registers multiple boxed checks.
    #[must_use]
    pub fn checks(mut self, checks: impl IntoIterator<Item = CheckBox>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Builds the runner.
    #[must_use]
    pub fn build(self) -> Runner {
        Runner {
            root: self.root.unwrap_or_else(|| PathBuf::from(".")),
            checks: self.checks,
        }
    }
}

/// Runs registered checks over one repository scan.
///
/// Fully synchronous and single-threaded; each run builds its own
/// [`CheckContext`] and nothing persists across runs.
pub struct Runner {
    root: PathBuf,
    checks: Vec<CheckBox>,
}

impl Runner {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Runs every check in registration order.
    ///
    /// # Errors
    ///
    /// Fails only on context discovery plumbing (see
    /// [`CheckContext::discover`]); findings in inspected code never surface
    /// as `Err`.
    pub fn run(&self) -> Result<RunSummary, LintError> {
        info!("scanning {}", self.root.display());
        let ctx = CheckContext::discover(&self.root)?;

        let mut results = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            debug!("running {}", check.name());
            results.push(check.run(&ctx));
        }

        info!(
            "scan complete: {} finding(s) across {} check(s)",
            results.iter().map(|r| r.findings.len()).sum::<usize>(),
            results.len()
        );
        Ok(RunSummary { results })
    }
}

/// Ordered results of one run.
#[derive(Debug)]
pub struct RunSummary {
    /// Per-check results, in registration order.
    pub results: Vec<CheckResult>,
}

impl RunSummary {
    /// Returns true if any check produced an error-level finding.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(CheckResult::has_errors)
    }

    /// Exit code for the whole run: 1 iff any error exists.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Renders all non-clean check reports, in order.
    #[must_use]
    pub fn render(&self) -> String {
        self.results.iter().map(CheckResult::render).collect()
    }
}
