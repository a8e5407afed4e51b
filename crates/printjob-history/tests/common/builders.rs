//! Builders and fake providers for creating test data programmatically.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use printjob_history::providers::{
    FileMetadataProvider, FilamentProvider, FilamentSnapshot, LayerProgressProvider,
    PreheatProvider, ProviderError, ProviderKind, Spool, SpoolProfile,
};
use printjob_history::{
    FileInfo, FilamentUsage, LayerProgress, PrintJob, PrintOutcome, TemperatureSample,
};

/// Builder for committed-looking `PrintJob` instances.
pub struct PrintJobBuilder {
    job: PrintJob,
}

impl PrintJobBuilder {
    pub fn new(started_at: NaiveDateTime) -> Self {
        Self {
            job: PrintJob::new(started_at),
        }
    }

    pub fn file(mut self, name: &str) -> Self {
        self.job.file_name = Some(name.to_string());
        self.job.file_path_label = Some(format!("prints/{}", name));
        self
    }

    pub fn size(mut self, bytes: i64) -> Self {
        self.job.file_size_bytes = Some(bytes);
        self
    }

    pub fn owner(mut self, user: &str) -> Self {
        self.job.owner_user_name = Some(user.to_string());
        self
    }

    pub fn lasted(mut self, duration: Duration) -> Self {
        self.job.ended_at = Some(self.job.started_at + duration);
        self
    }

    pub fn outcome(mut self, outcome: PrintOutcome) -> Self {
        self.job.outcome = Some(outcome);
        self
    }

    pub fn progress(mut self, layers: &str, height: &str) -> Self {
        self.job.printed_layers_label = Some(layers.to_string());
        self.job.printed_height_label = Some(height.to_string());
        self
    }

    pub fn note(mut self, text: &str, delta: &str, html: &str) -> Self {
        self.job.note_text = Some(text.to_string());
        self.job.note_rich_delta = Some(delta.to_string());
        self.job.note_rich_html = Some(html.to_string());
        self
    }

    pub fn temperature(mut self, sensor: &str, celsius: f64) -> Self {
        self.job
            .temperature_samples
            .push(TemperatureSample::new(sensor, celsius));
        self
    }

    pub fn filament(mut self, filament: FilamentUsage) -> Self {
        self.job.filament = Some(filament);
        self
    }

    pub fn build(self) -> PrintJob {
        self.job
    }
}

/// A filament record with every field set.
pub fn full_filament() -> FilamentUsage {
    FilamentUsage {
        calculated_length_mm: Some(1234.5678),
        used_length_mm: Some(1198.25),
        spool_name: Some("Galaxy Black".to_string()),
        spool_cost: Some(24.99),
        spool_cost_unit: Some("€".to_string()),
        spool_weight_g: Some(1000.0),
        material_vendor: Some("Prusament".to_string()),
        material_type: Some("PLA".to_string()),
        filament_diameter_mm: Some(1.75),
        filament_density: Some(1.24),
    }
}

pub fn file_info(name: &str) -> FileInfo {
    FileInfo {
        origin: "local".to_string(),
        name: name.to_string(),
        path: format!("prints/{}", name),
        size: Some(2048),
        owner: Some("ada".to_string()),
    }
}

pub fn layer(current: u32, total: u32) -> LayerProgress {
    LayerProgress {
        current_layer: current.to_string(),
        total_layer: total.to_string(),
        current_height: format!("{:.1}", current as f64 * 0.2),
        total_height_with_extrusion: format!("{:.1}", total as f64 * 0.2),
    }
}

/// Pre-heat provider returning fixed targets.
pub struct FixedPreheat(pub BTreeMap<String, f64>);

impl FixedPreheat {
    pub fn tool_and_bed(tool: f64, bed: f64) -> Self {
        Self(BTreeMap::from([
            ("tool0".to_string(), tool),
            ("bed".to_string(), bed),
        ]))
    }
}

impl PreheatProvider for FixedPreheat {
    fn read_temperatures(
        &self,
        _origin: &str,
        _path: &str,
    ) -> Result<BTreeMap<String, f64>, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Filament provider whose every call fails.
pub struct FailingFilament;

impl FilamentProvider for FailingFilament {
    fn snapshot(&self) -> Result<FilamentSnapshot, ProviderError> {
        Err(ProviderError::new(
            ProviderKind::FilamentManager,
            "database locked",
        ))
    }
}

/// Filament provider with a PLA spool selected.
pub struct SelectedSpool;

impl FilamentProvider for SelectedSpool {
    fn snapshot(&self) -> Result<FilamentSnapshot, ProviderError> {
        Ok(FilamentSnapshot {
            used_length_mm: Some(1198.25),
            selected_spool: Some(Spool {
                name: Some("Galaxy Black".to_string()),
                cost: Some(24.99),
                weight_g: Some(1000.0),
                profile: SpoolProfile {
                    vendor: Some("Prusament".to_string()),
                    material: Some("PLA".to_string()),
                    diameter_mm: Some(1.75),
                    density: Some(1.24),
                },
            }),
            currency_symbol: Some("€".to_string()),
        })
    }
}

/// Slicer metadata with a fixed tool 0 length.
pub struct SlicerMetadata(pub f64);

impl FileMetadataProvider for SlicerMetadata {
    fn calculated_filament_length(&self, _origin: &str, _path: &str) -> Option<f64> {
        Some(self.0)
    }
}

pub struct LayerTracker;

impl LayerProgressProvider for LayerTracker {
    fn name(&self) -> &str {
        "DisplayLayerProgress"
    }
}
