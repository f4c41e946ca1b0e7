//! # pdk-lint-core
//!
//! Core framework for statically linting gdsfactory-convention PDK
//! repositories, without importing or executing the inspected code.
//!
//! This crate provides:
//!
//! - [`Check`] trait and [`Runner`] for orchestrating check execution
//! - [`Finding`] / [`CheckResult`] for the reporting contract
//! - [`LayoutResolver`] / [`PackageLayout`] for repository structure
//!   discovery (flat and multi-band)
//! - tree-sitter based Python parsing ([`parse`]) with import-alias
//!   resolution ([`aliases`]) and alias-aware matchers ([`matchers`])
//!
//! ## Example
//!
//! ```ignore
//! use pdk_lint_core::Runner;
//!
//! let summary = Runner::builder()
//!     .root(".")
//!     .check(MyCheck::new())
//!     .build()
//!     .run()?;
//! print!("{}", summary.render());
//! std::process::exit(summary.exit_code());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aliases;
mod check;
mod context;
mod error;
pub mod layout;
pub mod matchers;
pub mod parse;
mod pyproject;
mod runner;
mod types;

pub use check::{Check, CheckBox};
pub use context::CheckContext;
pub use error::LintError;
pub use layout::{LayoutResolver, PackageLayout};
pub use pyproject::PyProject;
pub use runner::{RunSummary, Runner, RunnerBuilder};
pub use types::{CheckResult, Finding, Location, Severity};
