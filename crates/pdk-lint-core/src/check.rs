//! The check trait every rule implements.

use crate::context::CheckContext;
use crate::types::CheckResult;

/// One compliance check over a discovered repository.
///
/// A check resolves its candidate files from the shared [`CheckContext`],
/// parses them, runs its matchers, and returns an ordered [`CheckResult`].
/// Checks never return raw errors for problems *in the inspected code*;
/// those become findings or documented skips.
///
/// # Example
///
/// ```ignore
/// use pdk_lint_core::{Check, CheckContext, CheckResult};
///
/// pub struct RequireReadme;
///
/// impl Check for RequireReadme {
///     fn name(&self) -> &'static str { "check-readme" }
///
///     fn run(&self, ctx: &CheckContext) -> CheckResult {
///         let mut result = CheckResult::new(self.name());
///         if !ctx.repo_root.join("README.md").exists() {
///             result.error("README.md not found");
///         }
///         result
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Kebab-case name of this check (e.g. `check-no-raw-layers`).
    fn name(&self) -> &'static str;

    /// Brief description of what this check enforces.
    fn description(&self) -> &'static str {
        ""
    }

    /// Runs the check against one discovered repository.
    fn run(&self, ctx: &CheckContext) -> CheckResult;
}

/// Type alias for boxed check trait objects.
pub type CheckBox = Box<dyn Check>;
