//! pdk-lint CLI tool.
//!
//! Usage:
//! ```bash
//! pdk-lint all [--root PATH] [--format text|json]
//! pdk-lint check-no-raw-layers --root path/to/pdk-repo
//! pdk-lint --list
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use pdk_lint_checks::{all_checks, check_by_name, check_names};
use pdk_lint_core::{RunSummary, Runner};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Compliance linter for gdsfactory-convention PDK repositories
#[derive(Parser)]
#[command(name = "pdk-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Check to run, or "all" for every built-in check
    #[arg(default_value = "all")]
    check: String,

    /// Repository root to lint
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// List available checks and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        for name in check_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let checks = if cli.check == "all" {
        all_checks()
    } else {
        match check_by_name(&cli.check) {
            Some(check) => vec![check],
            None => bail!(
                "unknown check '{}' (available: {})",
                cli.check,
                check_names().join(", ")
            ),
        }
    };

    let runner = Runner::builder().root(&cli.root).checks(checks).build();

    tracing::info!(
        "linting {} with {} check(s)",
        cli.root.display(),
        runner.check_count()
    );

    let summary = runner
        .run()
        .with_context(|| format!("failed to lint {}", cli.root.display()))?;

    print_summary(&summary, cli.format)?;

    std::process::exit(summary.exit_code());
}

fn print_summary(summary: &RunSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let rendered = summary.render();
            if !rendered.is_empty() {
                print!("{rendered}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary.results)?;
            println!("{json}");
        }
    }
    Ok(())
}
