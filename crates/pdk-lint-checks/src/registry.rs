//! Built-in check registry.

use crate::{
    CellsStructure, MultiBand, NoMainInCells, NoRawLayers, PackageInit, PdkObject, TechStructure,
};
use pdk_lint_core::CheckBox;

/// Returns every built-in check in reporting order.
#[must_use]
pub fn all_checks() -> Vec<CheckBox> {
    vec![
        Box::new(PackageInit::new()),
        Box::new(CellsStructure::new()),
        Box::new(TechStructure::new()),
        Box::new(PdkObject::new()),
        Box::new(NoRawLayers::new()),
        Box::new(NoMainInCells::new()),
        Box::new(MultiBand::new()),
    ]
}

/// Looks up one built-in check by its reported name.
#[must_use]
pub fn check_by_name(name: &str) -> Option<CheckBox> {
    all_checks().into_iter().find(|c| c.name() == name)
}

/// The names of every built-in check, in reporting order.
#[must_use]
pub fn check_names() -> Vec<&'static str> {
    vec![
        crate::package_init::NAME,
        crate::cells_structure::NAME,
        crate::tech_structure::NAME,
        crate::pdk_object::NAME,
        crate::no_raw_layers::NAME,
        crate::no_main_in_cells::NAME,
        crate::multi_band::NAME,
    ]
}
