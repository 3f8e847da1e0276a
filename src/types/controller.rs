//! WLED lighting controllers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

use crate::{DashboardError, Result};

/// A lighting controller registered with the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    pub id: u64,
    pub name: String,
    pub ip_address: String,
    pub universe: u32,
    #[serde(default)]
    pub color_theme: Option<String>,
    #[serde(default)]
    pub idle_effect: Option<String>,
    #[serde(default)]
    pub auto_on: bool,
    /// Set from the outcome of the last state poll
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub state: Option<ControllerState>,
}

/// Device state reported by the controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    #[serde(default)]
    pub on: bool,
    #[serde(default, rename = "bri")]
    pub brightness: u8,
    /// Any other keys the firmware reports
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Unsaved controller form contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerDraft {
    pub name: String,
    pub ip_address: String,
    pub universe: String,
    #[serde(default)]
    pub color_theme: Option<String>,
    #[serde(default)]
    pub idle_effect: Option<String>,
    #[serde(default)]
    pub auto_on: bool,
}

impl ControllerDraft {
    /// Check required fields. Returns the parsed universe on success.
    pub fn validate(&self) -> Result<u32> {
        if self.name.trim().is_empty() {
            return Err(DashboardError::validation("name", "required"));
        }
        if self.ip_address.trim().is_empty() {
            return Err(DashboardError::validation("ipAddress", "required"));
        }
        self.ip_address
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| DashboardError::validation("ipAddress", e.to_string()))?;
        if self.universe.trim().is_empty() {
            return Err(DashboardError::validation("universe", "required"));
        }
        self.universe
            .trim()
            .parse::<u32>()
            .map_err(|e| DashboardError::validation("universe", e.to_string()))
    }

    /// Build the controller record once the API has assigned an id.
    pub fn into_controller(self, id: u64) -> Result<Controller> {
        let universe = self.validate()?;
        Ok(Controller {
            id,
            name: self.name.trim().to_string(),
            ip_address: self.ip_address.trim().to_string(),
            universe,
            color_theme: self.color_theme,
            idle_effect: self.idle_effect,
            auto_on: self.auto_on,
            is_available: false,
            state: None,
        })
    }
}
