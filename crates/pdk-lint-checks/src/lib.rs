//! # pdk-lint-checks
//!
//! Built-in compliance checks for gdsfactory-convention PDK repositories.
//!
//! ## Available Checks
//!
//! | Name | Description |
//! |------|-------------|
//! | `check-package-init` | Validates `__version__` and `__all__` in the package `__init__.py` |
//! | `check-cells-structure` | Validates cell decorators, docstrings, and `cells/` re-exports |
//! | `check-tech-structure` | Validates `tech.py` declarations and `layers.yaml` drift |
//! | `check-pdk-object` | Validates the `Pdk()` constructor call and its kwargs |
//! | `check-no-raw-layers` | Forbids raw `(int, int)` layer tuples in cell code |
//! | `check-no-main-in-cells` | Forbids `if __name__ == "__main__"` blocks in cell files |
//! | `check-multi-band` | Validates cross-band structural consistency |
//!
//! ## Usage
//!
//! ```ignore
//! use pdk_lint_core::Runner;
//! use pdk_lint_checks::all_checks;
//!
//! let runner = Runner::builder()
//!     .root(".")
//!     .checks(all_checks())
//!     .build();
//! let summary = runner.run()?;
//! std::process::exit(summary.exit_code());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cells_structure;
mod multi_band;
mod no_main_in_cells;
mod no_raw_layers;
mod package_init;
mod pdk_object;
mod registry;
mod tech_structure;

pub use cells_structure::CellsStructure;
pub use multi_band::MultiBand;
pub use no_main_in_cells::NoMainInCells;
pub use no_raw_layers::NoRawLayers;
pub use package_init::PackageInit;
pub use pdk_object::PdkObject;
pub use registry::{all_checks, check_by_name, check_names};
pub use tech_structure::TechStructure;

/// Re-export core types for convenience.
pub use pdk_lint_core::{Check, CheckResult, Finding, Severity};
