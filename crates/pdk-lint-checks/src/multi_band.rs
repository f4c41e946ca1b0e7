//! Check structural consistency across technology bands.
//!
//! A band is a package subdirectory mirroring the top-level module layout
//! for one technology variant. Single-band and flat packages are skipped
//! silently.

use pdk_lint_core::{Check, CheckContext, CheckResult, Location};
use std::path::Path;

/// Check name for multi-band.
pub const NAME: &str = "check-multi-band";

/// Per-band structural signature, compared key-by-key across bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BandSignature {
    has_cells: bool,
    has_tech: bool,
    has_models: bool,
    has_init: bool,
}

impl BandSignature {
    fn of(band: &Path) -> Self {
        Self {
            has_cells: band.join("cells").is_dir() || band.join("cells.py").exists(),
            has_tech: band.join("tech.py").exists(),
            has_models: band.join("models").is_dir() || band.join("models.py").exists(),
            has_init: band.join("__init__.py").exists(),
        }
    }

    /// Fixed key order keeps repeated runs byte-identical.
    fn keys(&self) -> [(&'static str, bool); 4] {
        [
            ("has_cells", self.has_cells),
            ("has_tech", self.has_tech),
            ("has_models", self.has_models),
            ("has_init", self.has_init),
        ]
    }
}

/// Compares band module sets, per-band tests, and layer-file placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiBand;

impl MultiBand {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for MultiBand {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Validates cross-band structural consistency"
    }

    fn run(&self, ctx: &CheckContext) -> CheckResult {
        let mut result = CheckResult::new(self.name());
        let Some(layout) = &ctx.layout else {
            return result;
        };
        if !layout.is_multi_band() {
            return result;
        }

        let pkg_name = dir_name(&layout.root);
        let bands: Vec<(String, &Path)> = layout
            .bands
            .iter()
            .map(|b| (dir_name(b), b.as_path()))
            .collect();

        // Each band must carry the core module set.
        let mut signatures: Vec<(String, BandSignature)> = Vec::new();
        for (band_name, band) in &bands {
            let sig = BandSignature::of(band);
            let display = ctx.display_path(band);
            if !sig.has_init {
                result.error_at(Location::new(display.clone()), "missing __init__.py");
            }
            if !sig.has_cells {
                result.error_at(
                    Location::new(display.clone()),
                    "missing cells module (cells/ or cells.py)",
                );
            }
            if !sig.has_tech {
                result.error_at(Location::new(display), "missing tech.py");
            }
            signatures.push((band_name.clone(), sig));
        }

        // Cross-band drift: first band (lexicographic) is the reference.
        let (reference_name, reference) = &signatures[0];
        for (band_name, sig) in &signatures[1..] {
            for ((key, ref_val), (_, val)) in reference.keys().iter().zip(sig.keys().iter()) {
                if val != ref_val {
                    result.warn(format!(
                        "inconsistency: {reference_name} {key}={ref_val} but {band_name} {key}={val}"
                    ));
                }
            }
        }

        // Per-band tests, any of four naming conventions.
        let tests_dir = ctx.repo_root.join("tests");
        if tests_dir.is_dir() {
            for (band_name, _) in &bands {
                let patterns = [
                    tests_dir.join(format!("test_{pkg_name}_{band_name}.py")),
                    tests_dir.join(format!("test_{band_name}.py")),
                    tests_dir.join(band_name).join("test_pdk.py"),
                    tests_dir.join(band_name).join(format!("test_{pkg_name}.py")),
                ];
                if !patterns.iter().any(|p| p.exists()) {
                    result.warn(format!(
                        "no test file found for band '{band_name}' (expected test_{pkg_name}_{band_name}.py or similar)"
                    ));
                }
            }
        }

        // Layer declarations belong at the package root, not per band.
        let bands_with_layers: Vec<&str> = bands
            .iter()
            .filter(|(_, band)| band.join("layers.py").exists())
            .map(|(name, _)| name.as_str())
            .collect();
        if bands_with_layers.len() > 1 {
            result.warn(format!(
                "layers.py found in multiple bands: {bands_with_layers:?} - consider sharing layers at the package root"
            ));
        }

        result
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
