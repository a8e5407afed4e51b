//! Optional data providers consulted while a print job is recorded.
//!
//! Every provider is independently optional. A provider that is not bound,
//! fails, or returns nothing leaves the matching job fields empty.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// A provider call failed. Never surfaced past the lifecycle reconciler.
#[derive(Error, Debug)]
#[error("{provider} provider failed: {message}")]
pub struct ProviderError {
    pub provider: ProviderKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// The optional provider integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderKind {
    PreHeat,
    FilamentManager,
    DisplayLayerProgress,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::PreHeat => write!(f, "PreHeat"),
            ProviderKind::FilamentManager => write!(f, "FilamentManager"),
            ProviderKind::DisplayLayerProgress => write!(f, "DisplayLayerProgress"),
        }
    }
}

/// Reads slicer metadata embedded in a stored file.
pub trait FileMetadataProvider: Send + Sync {
    /// Filament length (mm) the slicer computed for tool 0, if known.
    fn calculated_filament_length(&self, origin: &str, path: &str) -> Option<f64>;
}

/// Reads pre-heat target temperatures from a file.
pub trait PreheatProvider: Send + Sync {
    /// Sensor name to target temperature; contains at least `tool0` when present.
    fn read_temperatures(
        &self,
        origin: &str,
        path: &str,
    ) -> Result<BTreeMap<String, f64>, ProviderError>;
}

/// Filament accounting: the extruded length and the currently selected spool.
pub trait FilamentProvider: Send + Sync {
    fn snapshot(&self) -> Result<FilamentSnapshot, ProviderError>;
}

/// Source of layer-progress events.
///
/// Progress itself is delivered through
/// [`PrintEvent::LayerChanged`](crate::lifecycle::PrintEvent::LayerChanged);
/// binding a provider only records that one is installed.
pub trait LayerProgressProvider: Send + Sync {
    fn name(&self) -> &str;
}

/// State of the filament-accounting provider at one moment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilamentSnapshot {
    /// Cumulative extrusion for the active tool, in mm.
    pub used_length_mm: Option<f64>,
    /// `None` when no spool is selected.
    pub selected_spool: Option<Spool>,
    pub currency_symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spool {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub weight_g: Option<f64>,
    pub profile: SpoolProfile,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpoolProfile {
    pub vendor: Option<String>,
    pub material: Option<String>,
    pub diameter_mm: Option<f64>,
    pub density: Option<f64>,
}

/// The set of bound providers.
#[derive(Clone, Default)]
pub struct Providers {
    pub file_metadata: Option<Arc<dyn FileMetadataProvider>>,
    pub preheat: Option<Arc<dyn PreheatProvider>>,
    pub filament: Option<Arc<dyn FilamentProvider>>,
    pub layer_progress: Option<Arc<dyn LayerProgressProvider>>,
}

impl Providers {
    /// No providers bound.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_file_metadata(mut self, provider: Arc<dyn FileMetadataProvider>) -> Self {
        self.file_metadata = Some(provider);
        self
    }

    pub fn with_preheat(mut self, provider: Arc<dyn PreheatProvider>) -> Self {
        self.preheat = Some(provider);
        self
    }

    pub fn with_filament(mut self, provider: Arc<dyn FilamentProvider>) -> Self {
        self.filament = Some(provider);
        self
    }

    pub fn with_layer_progress(mut self, provider: Arc<dyn LayerProgressProvider>) -> Self {
        self.layer_progress = Some(provider);
        self
    }

    /// Optional third-party providers that are not bound.
    pub fn missing(&self) -> Vec<ProviderKind> {
        let mut missing = Vec::new();
        if self.preheat.is_none() {
            missing.push(ProviderKind::PreHeat);
        }
        if self.filament.is_none() {
            missing.push(ProviderKind::FilamentManager);
        }
        if self.layer_progress.is_none() {
            missing.push(ProviderKind::DisplayLayerProgress);
        }
        missing
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("file_metadata", &self.file_metadata.is_some())
            .field("preheat", &self.preheat.is_some())
            .field("filament", &self.filament.is_some())
            .field("layer_progress", &self.layer_progress.is_some())
            .finish()
    }
}
