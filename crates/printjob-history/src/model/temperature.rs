//! Temperature sample recorded when a print starts.

use serde::{Deserialize, Serialize};

/// One sensor target temperature (e.g. `tool0`, `bed`).
///
/// Samples have no timestamp of their own; their position in
/// [`PrintJob::temperature_samples`](super::PrintJob::temperature_samples)
/// is the recording order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSample {
    pub sensor_name: String,
    pub sensor_value_celsius: f64,
}

impl TemperatureSample {
    pub fn new(sensor_name: impl Into<String>, sensor_value_celsius: f64) -> Self {
        Self {
            sensor_name: sensor_name.into(),
            sensor_value_celsius,
        }
    }
}
