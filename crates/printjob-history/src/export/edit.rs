//! Client edits of history rows, mapped back into print jobs.

use serde::Deserialize;
use serde_json::Value;

use super::format::{format_display_timestamp, format_length, parse_display_timestamp};
use super::view::{ClientJobView, ClientTemperatureView};
use crate::error::{HistoryError, Result};
use crate::model::{FilamentUsage, PrintJob, PrintOutcome, TemperatureSample};

/// A history row as submitted by a client, with filament fields flattened.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientJobEdit {
    pub database_id: Option<i64>,
    pub user_name: Option<String>,
    pub print_status_result: Option<String>,
    pub print_start_date_time_formatted: Option<String>,
    pub print_end_date_time_formatted: Option<String>,
    pub file_name: Option<String>,
    pub file_path_name: Option<String>,
    pub file_size: Option<i64>,
    pub printed_layers: Option<String>,
    pub printed_height: Option<String>,
    pub note_text: Option<String>,
    /// Rich-text delta; either a JSON document or its serialized text.
    pub note_delta: Option<Value>,
    pub note_html: Option<String>,
    pub profile_vendor: Option<String>,
    pub diameter: Option<f64>,
    pub density: Option<f64>,
    pub material: Option<String>,
    pub spool_name: Option<String>,
    pub spool_cost: Option<f64>,
    pub spool_cost_unit: Option<String>,
    pub spool_weight: Option<f64>,
    pub used_length: Option<f64>,
    /// A number, or the two-decimal text the list view renders.
    pub calculated_length: Option<Value>,
    pub temperature_entities: Vec<ClientTemperatureView>,
}

impl From<ClientJobView> for ClientJobEdit {
    fn from(view: ClientJobView) -> Self {
        let filament = view.filament_entity.unwrap_or_default();

        Self {
            database_id: view.database_id,
            user_name: view.user_name,
            print_status_result: view.print_status_result,
            print_start_date_time_formatted: Some(view.print_start_date_time_formatted),
            print_end_date_time_formatted: view.print_end_date_time_formatted,
            file_name: view.file_name,
            file_path_name: view.file_path_name,
            file_size: view.file_size,
            printed_layers: view.printed_layers,
            printed_height: view.printed_height,
            note_text: view.note_text,
            note_delta: view.note_delta.map(Value::String),
            note_html: view.note_html,
            profile_vendor: filament.profile_vendor,
            diameter: filament.diameter,
            density: filament.density,
            material: filament.material,
            spool_name: filament.spool_name,
            spool_cost: filament.spool_cost,
            spool_cost_unit: filament.spool_cost_unit,
            spool_weight: filament.spool_weight,
            used_length: filament.used_length,
            calculated_length: filament.calculated_length.map(Value::String),
            temperature_entities: view.temperature_entities,
        }
    }
}

fn parse_error(field: &str, value: impl ToString, reason: impl Into<String>) -> HistoryError {
    HistoryError::Parse {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn required_timestamp(field: &str, value: &Option<String>) -> Result<chrono::NaiveDateTime> {
    match value {
        Some(v) => parse_display_timestamp(field, v),
        None => Err(parse_error(field, "", "missing value")),
    }
}

fn parse_length(value: &Option<Value>) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() || s.trim() == "-" => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| parse_error("calculatedLength", s, e.to_string())),
        Some(other) => Err(parse_error("calculatedLength", other, "expected a number")),
    }
}

fn note_delta_text(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Rebuilds a print job from a client edit.
///
/// A `databaseId` makes the subsequent upsert replace that row; without one
/// the edit creates a new history entry. Temperature samples submitted with
/// the edit are carried over so the replace does not drop them.
pub fn from_client_edit(edit: &ClientJobEdit) -> Result<PrintJob> {
    let started_at = required_timestamp(
        "printStartDateTimeFormatted",
        &edit.print_start_date_time_formatted,
    )?;
    let ended_at = required_timestamp(
        "printEndDateTimeFormatted",
        &edit.print_end_date_time_formatted,
    )?;

    let outcome = edit
        .print_status_result
        .as_deref()
        .map(|s| {
            s.parse::<PrintOutcome>()
                .map_err(|reason| parse_error("printStatusResult", s, reason))
        })
        .transpose()?;

    let filament = FilamentUsage {
        calculated_length_mm: parse_length(&edit.calculated_length)?,
        used_length_mm: edit.used_length,
        spool_name: edit.spool_name.clone(),
        spool_cost: edit.spool_cost,
        spool_cost_unit: edit.spool_cost_unit.clone(),
        spool_weight_g: edit.spool_weight,
        material_vendor: edit.profile_vendor.clone(),
        material_type: edit.material.clone(),
        filament_diameter_mm: edit.diameter,
        filament_density: edit.density,
    };
    let filament = (filament != FilamentUsage::default()).then_some(filament);

    Ok(PrintJob {
        id: edit.database_id,
        file_name: edit.file_name.clone(),
        file_path_label: edit.file_path_name.clone(),
        file_size_bytes: edit.file_size,
        owner_user_name: edit.user_name.clone(),
        started_at,
        ended_at: Some(ended_at),
        outcome,
        printed_layers_label: edit.printed_layers.clone(),
        printed_height_label: edit.printed_height.clone(),
        note_text: edit.note_text.clone(),
        note_rich_delta: note_delta_text(&edit.note_delta),
        note_rich_html: edit.note_html.clone(),
        filament,
        temperature_samples: edit
            .temperature_entities
            .iter()
            .map(TemperatureSample::from)
            .collect(),
    })
}

/// Restores stored full-precision values the edit resubmitted unchanged.
///
/// The list view shows timestamps to the minute and lengths to two decimals,
/// so an edit echoes those renderings back. Where the edited value renders the
/// same as the stored one, the stored value is kept; seconds on `started_at`
/// also key the snapshot file name.
pub fn keep_stored_precision(job: &mut PrintJob, stored: &PrintJob) {
    if format_display_timestamp(&job.started_at) == format_display_timestamp(&stored.started_at) {
        job.started_at = stored.started_at;
    }

    if let (Some(ended), Some(stored_end)) = (job.ended_at, stored.ended_at) {
        if format_display_timestamp(&ended) == format_display_timestamp(&stored_end) {
            job.ended_at = Some(stored_end);
        }
    }

    let stored_length = stored
        .filament
        .as_ref()
        .and_then(|f| f.calculated_length_mm);
    if let (Some(filament), Some(stored_length)) = (job.filament.as_mut(), stored_length) {
        if filament.calculated_length_mm.map(format_length) == Some(format_length(stored_length)) {
            filament.calculated_length_mm = Some(stored_length);
        }
    }
}
