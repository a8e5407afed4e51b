//! Events delivered by the host printer runtime.

use serde::Deserialize;

/// Describes the file being printed, as reported with start and terminal events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Storage the file lives on (e.g. `local`, `sdcard`).
    #[serde(default)]
    pub origin: String,
    /// File name without folders.
    pub name: String,
    /// Path relative to the origin.
    #[serde(default)]
    pub path: String,
    pub size: Option<i64>,
    pub owner: Option<String>,
}

/// Layer change reported by the layer-progress provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerProgress {
    pub current_layer: String,
    pub total_layer: String,
    pub current_height: String,
    pub total_height_with_extrusion: String,
}

impl LayerProgress {
    pub fn layers_label(&self) -> String {
        format!("{}/{}", self.current_layer, self.total_layer)
    }

    pub fn height_label(&self) -> String {
        format!("{}/{}", self.current_height, self.total_height_with_extrusion)
    }
}

/// Host events the history reacts to, in the order they were received.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintEvent {
    ClientOpened,
    PrintStarted(FileInfo),
    LayerChanged(LayerProgress),
    PrintDone(FileInfo),
    PrintFailed(FileInfo),
    PrintCancelled(FileInfo),
}
