//! Check that cell files carry no `if __name__ == "__main__"` block.

use pdk_lint_core::matchers::has_main_guard;
use pdk_lint_core::parse::parse_file;
use pdk_lint_core::{Check, CheckContext, CheckResult, Location};

/// Check name for no-main-in-cells.
pub const NAME: &str = "check-no-main-in-cells";

/// Flags leftover script entry points in cell files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMainInCells;

impl NoMainInCells {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for NoMainInCells {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids if __name__ == \"__main__\" blocks in cell files"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            return result;
        };

        for cell_file in layout.cell_files() {
            let display = ctx.display_path(&cell_file);
            match parse_file(&cell_file) {
                Ok(file) => {
                    if has_main_guard(file.root(), file.bytes()) {
                        result.error_at(
                            Location::new(display),
                            "contains `if __name__ == \"__main__\"` block - \
                             remove debug/test code from cell files",
                        );
                    }
                }
                Err(e) if e.is_syntax() => {
                    result.warn_at(Location::new(display), "could not parse (syntax error)");
                }
                Err(_) => {
                    result.warn_at(Location::new(display), "could not read file");
                }
            }
        }

        result
    }
}
