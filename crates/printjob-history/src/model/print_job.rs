//! Print job aggregate root.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{FilamentUsage, TemperatureSample};

/// Terminal result of a print job.
///
/// A job that is still running has no outcome (`None` on [`PrintJob`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintOutcome {
    Success,
    Failed,
    Canceled,
}

impl PrintOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintOutcome::Success => "success",
            PrintOutcome::Failed => "failed",
            PrintOutcome::Canceled => "canceled",
        }
    }
}

impl fmt::Display for PrintOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(PrintOutcome::Success),
            "failed" => Ok(PrintOutcome::Failed),
            // Host events use the British spelling.
            "canceled" | "cancelled" => Ok(PrintOutcome::Canceled),
            other => Err(format!("unknown print outcome '{}'", other)),
        }
    }
}

/// One print attempt, from start signal to terminal signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    /// Store-assigned id; `None` until the job is committed.
    pub id: Option<i64>,
    pub file_name: Option<String>,
    pub file_path_label: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub owner_user_name: Option<String>,
    /// Local wall-clock time the print started.
    pub started_at: NaiveDateTime,
    /// Local wall-clock time the print ended; `None` until committed.
    pub ended_at: Option<NaiveDateTime>,
    pub outcome: Option<PrintOutcome>,
    /// `current/total` layers, as reported by the layer-progress provider.
    pub printed_layers_label: Option<String>,
    /// `current/total` height, as reported by the layer-progress provider.
    pub printed_height_label: Option<String>,
    pub note_text: Option<String>,
    pub note_rich_delta: Option<String>,
    pub note_rich_html: Option<String>,
    pub filament: Option<FilamentUsage>,
    pub temperature_samples: Vec<TemperatureSample>,
}

impl PrintJob {
    /// Creates an uncommitted job that started at `started_at`.
    pub fn new(started_at: NaiveDateTime) -> Self {
        Self {
            started_at,
            ..Default::default()
        }
    }

    /// Returns true once the store has assigned an id.
    pub fn is_committed(&self) -> bool {
        self.id.is_some()
    }

    /// Appends a temperature sample, keeping recording order.
    pub fn record_temperature(&mut self, sensor_name: impl Into<String>, value: f64) {
        self.temperature_samples
            .push(TemperatureSample::new(sensor_name, value));
    }
}
