//! Flat, JSON-serializable view of stored print jobs.

use serde::{Deserialize, Serialize};

use super::format::{format_display_timestamp, format_duration, format_length};
use super::snapshot::snapshot_file_name;
use crate::model::{FilamentUsage, PrintJob, TemperatureSample};

/// A print job as shown in the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJobView {
    pub database_id: Option<i64>,
    pub user_name: Option<String>,
    pub print_status_result: Option<String>,
    pub print_start_date_time_formatted: String,
    pub print_end_date_time_formatted: Option<String>,
    pub duration_formatted: Option<String>,
    pub file_name: Option<String>,
    pub file_path_name: Option<String>,
    pub file_size: Option<i64>,
    pub printed_layers: Option<String>,
    pub printed_height: Option<String>,
    pub note_text: Option<String>,
    pub note_delta: Option<String>,
    pub note_html: Option<String>,
    pub filament_entity: Option<ClientFilamentView>,
    pub temperature_entities: Vec<ClientTemperatureView>,
    pub snapshot_filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilamentView {
    /// Two-decimal rendering of the slicer-computed length.
    pub calculated_length: Option<String>,
    pub used_length: Option<f64>,
    pub spool_name: Option<String>,
    pub spool_cost: Option<f64>,
    pub spool_cost_unit: Option<String>,
    pub spool_weight: Option<f64>,
    pub profile_vendor: Option<String>,
    pub material: Option<String>,
    pub diameter: Option<f64>,
    pub density: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTemperatureView {
    pub sensor_name: String,
    pub sensor_value: f64,
}

impl From<&FilamentUsage> for ClientFilamentView {
    fn from(f: &FilamentUsage) -> Self {
        Self {
            calculated_length: f.calculated_length_mm.map(format_length),
            used_length: f.used_length_mm,
            spool_name: f.spool_name.clone(),
            spool_cost: f.spool_cost,
            spool_cost_unit: f.spool_cost_unit.clone(),
            spool_weight: f.spool_weight_g,
            profile_vendor: f.material_vendor.clone(),
            material: f.material_type.clone(),
            diameter: f.filament_diameter_mm,
            density: f.filament_density,
        }
    }
}

impl From<&TemperatureSample> for ClientTemperatureView {
    fn from(t: &TemperatureSample) -> Self {
        Self {
            sensor_name: t.sensor_name.clone(),
            sensor_value: t.sensor_value_celsius,
        }
    }
}

impl From<&ClientTemperatureView> for TemperatureSample {
    fn from(t: &ClientTemperatureView) -> Self {
        TemperatureSample::new(t.sensor_name.clone(), t.sensor_value)
    }
}

impl From<&PrintJob> for ClientJobView {
    fn from(job: &PrintJob) -> Self {
        Self {
            database_id: job.id,
            user_name: job.owner_user_name.clone(),
            print_status_result: job.outcome.map(|o| o.as_str().to_string()),
            print_start_date_time_formatted: format_display_timestamp(&job.started_at),
            print_end_date_time_formatted: job.ended_at.as_ref().map(format_display_timestamp),
            duration_formatted: job.ended_at.map(|end| format_duration(end - job.started_at)),
            file_name: job.file_name.clone(),
            file_path_name: job.file_path_label.clone(),
            file_size: job.file_size_bytes,
            printed_layers: job.printed_layers_label.clone(),
            printed_height: job.printed_height_label.clone(),
            note_text: job.note_text.clone(),
            note_delta: job.note_rich_delta.clone(),
            note_html: job.note_rich_html.clone(),
            filament_entity: job.filament.as_ref().map(ClientFilamentView::from),
            temperature_entities: job
                .temperature_samples
                .iter()
                .map(ClientTemperatureView::from)
                .collect(),
            snapshot_filename: snapshot_file_name(&job.started_at),
        }
    }
}

/// Projects stored jobs into the list view, keeping their order.
pub fn to_client_view(jobs: &[PrintJob]) -> Vec<ClientJobView> {
    jobs.iter().map(ClientJobView::from).collect()
}
