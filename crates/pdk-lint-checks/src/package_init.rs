//! Check the package `__init__.py` metadata bindings.

use pdk_lint_core::matchers::{assigned_string, assignments_to};
use pdk_lint_core::parse::parse_file;
use pdk_lint_core::{Check, CheckContext, CheckResult, Location};

/// Check name for package-init.
pub const NAME: &str = "check-package-init";

/// Requires `__init__.py` with `__version__` (string literal) and `__all__`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageInit;

impl PackageInit {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for PackageInit {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Validates __version__ and __all__ in the package __init__.py"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            result.warn("could not locate package directory - skipping");
            return result;
        };

        let init_path = layout.root.join("__init__.py");
        let display = ctx.display_path(&init_path);
        if !init_path.exists() {
            result.error_at(Location::new(display), "does not exist");
            return result;
        }

        let file = match parse_file(&init_path) {
            Ok(file) => file,
            Err(e) if e.is_syntax() => {
                result.warn_at(Location::new(display), "could not parse (syntax error)");
                return result;
            }
            Err(_) => {
                result.warn_at(Location::new(display), "could not read file");
                return result;
            }
        };

        let root = file.root();
        let source = file.bytes();

        if assigned_string(root, source, "__version__").is_none() {
            if assignments_to(root, source, "__version__").is_empty() {
                result.error_at(Location::new(display.clone()), "__version__ is not defined");
            } else {
                result.error_at(
                    Location::new(display.clone()),
                    "__version__ is defined but not as a string literal \
                     (must be __version__ = \"X.Y.Z\")",
                );
            }
        }

        if assignments_to(root, source, "__all__").is_empty() {
            result.error_at(Location::new(display), "__all__ is not defined");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run_with_init(source: Option<&str>) -> CheckResult {
        let repo = TempDir::new().unwrap();
        let pkg = repo.path().join("mypdk");
        fs::create_dir_all(&pkg).unwrap();
        if let Some(source) = source {
            fs::write(pkg.join("__init__.py"), source).unwrap();
        }
        // Discovery requires an init marker; hand the check a located
        // package so the missing-init branch is reachable.
        let layout = pdk_lint_core::PackageLayout {
            root: pkg,
            bands: Vec::new(),
        };
        let ctx = CheckContext::new(repo.path(), None, Some(layout));
        PackageInit::new().run(&ctx)
    }

    #[test]
    fn complete_init_is_clean() {
        let result = run_with_init(Some(
            "__version__ = \"0.1.0\"\n__all__ = [\"cells\", \"tech\"]\n",
        ));
        assert!(result.is_clean());
    }

    #[test]
    fn missing_init_is_an_error() {
        let result = run_with_init(None);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "does not exist");
    }

    #[test]
    fn missing_version_and_all_are_separate_errors() {
        let result = run_with_init(Some("from . import cells\n"));
        let messages: Vec<_> = result.errors().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            ["__version__ is not defined", "__all__ is not defined"]
        );
    }

    #[test]
    fn non_literal_version_gets_the_specific_error() {
        let result = run_with_init(Some(
            "import importlib.metadata\n\
             __version__ = importlib.metadata.version(\"mypdk\")\n\
             __all__ = []\n",
        ));
        let messages: Vec<_> = result.errors().map(|f| f.message.as_str()).collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("not as a string literal"));
    }

    #[test]
    fn undiscoverable_package_warns_and_skips() {
        let repo = TempDir::new().unwrap();
        let ctx = CheckContext::new(repo.path(), None, None);
        let result = PackageInit::new().run(&ctx);
        assert!(!result.has_errors());
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn unparsable_init_is_a_warning_not_an_error() {
        let result = run_with_init(Some("def broken(:\n"));
        assert!(!result.has_errors());
        let warnings: Vec<_> = result.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("syntax error"));
    }
}
