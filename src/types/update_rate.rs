//! Refresh rate control for live telemetry subscriptions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscriber wants to see telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Every snapshot the source publishes
    Native,

    /// At most this many snapshots per second, latest wins
    Max(u32),
}

impl Default for UpdateRate {
    fn default() -> Self {
        UpdateRate::Max(30)
    }
}

impl UpdateRate {
    /// Collapse rates at or above the source rate (and a zero cap) to `Native`.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Max(hz) if hz == 0 || hz as f64 >= source_hz => UpdateRate::Native,
            other => other,
        }
    }

    /// Minimum spacing between emissions, if the rate throttles at all.
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}
