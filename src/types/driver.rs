//! Driver profiles

use serde::{Deserialize, Serialize};

/// A driver profile as served by the sim rig API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: u64,
    pub name: String,
    /// Accumulated seconds on track
    #[serde(default)]
    pub track_time: f64,
    #[serde(default, rename = "image_url", alias = "profilePic")]
    pub image_url: Option<String>,
}

/// Driver store contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverState {
    pub active_driver: Option<Driver>,
    pub drivers: Vec<Driver>,
}
