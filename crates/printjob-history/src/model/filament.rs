//! Filament usage captured when a print reaches a terminal state.

use serde::{Deserialize, Serialize};

/// Filament consumed by a print job.
///
/// `calculated_length_mm` comes from the slicer metadata of the printed file.
/// Every other field is filled only when a filament-accounting provider is
/// bound and has a spool selected at the time the job ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentUsage {
    pub calculated_length_mm: Option<f64>,
    pub used_length_mm: Option<f64>,
    pub spool_name: Option<String>,
    pub spool_cost: Option<f64>,
    pub spool_cost_unit: Option<String>,
    pub spool_weight_g: Option<f64>,
    pub material_vendor: Option<String>,
    pub material_type: Option<String>,
    pub filament_diameter_mm: Option<f64>,
    pub filament_density: Option<f64>,
}
