//! Live telemetry snapshot model.
//!
//! The rig streams the latest iRacing values as a JSON object using the SDK's
//! variable names. Only the variables the dashboard reads are modelled; every
//! field is optional because the stream sends `{}` while iRacing is not
//! running.

use serde::{Deserialize, Serialize};

/// One frame of live data as published by the rig
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct TelemetrySnapshot {
    /// Radians, positive is counter-clockwise
    pub steering_wheel_angle: Option<f32>,
    pub driver_info: Option<DriverInfo>,
    #[serde(rename = "dcTractionControl")]
    pub dc_traction_control: Option<f32>,
    pub is_on_track: Option<bool>,
    /// Metres per second
    pub speed: Option<f32>,
    #[serde(rename = "RPM")]
    pub rpm: Option<f32>,
    pub gear: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct DriverInfo {
    pub driver_car_idx: Option<usize>,
    pub drivers: Vec<CarEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct CarEntry {
    pub car_screen_name: String,
    pub user_name: String,
}

impl TelemetrySnapshot {
    /// True when the rig had nothing to report
    pub fn is_empty(&self) -> bool {
        *self == TelemetrySnapshot::default()
    }

    /// The entry for the player's own car
    pub fn player_car(&self) -> Option<&CarEntry> {
        let info = self.driver_info.as_ref()?;
        info.drivers.get(info.driver_car_idx?)
    }
}
