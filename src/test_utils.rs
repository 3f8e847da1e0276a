//! Fixture builders shared by unit tests, integration tests and benches.

#![cfg(any(test, feature = "benchmark"))]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::Result;
use crate::StateContainer;
use crate::provider::SnapshotProvider;
use crate::store::Clock;
use crate::telemetry::{CarEntry, DriverInfo, TelemetrySnapshot};
use crate::types::{Controller, Driver, DriverRef, LapTime};

/// Seconds since the epoch as a UTC timestamp
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

/// Lap time fixture. `set_at` is `id` minutes after the epoch so load order
/// and time order agree.
pub fn lap(id: u64, driver_id: u64, car: &str, track: &str, config: &str, time: f64) -> LapTime {
    LapTime {
        id,
        driver: DriverRef { id: driver_id, name: format!("Driver {driver_id}") },
        car: car.to_string(),
        track_name: track.to_string(),
        track_config: config.to_string(),
        time,
        set_at: at(id as i64 * 60),
    }
}

/// Lap time fixture with an explicit `set_at`
pub fn lap_at(id: u64, set_at: DateTime<Utc>) -> LapTime {
    LapTime { set_at, ..lap(id, 1, "GT3", "Spa", "GP", 90.0) }
}

/// Idle, never-loaded lap time store
pub fn laptime_store(laps: Vec<LapTime>) -> StateContainer<Vec<LapTime>> {
    StateContainer::new(laps)
}

/// Five laps over two drivers and two cars.
///
/// | id | driver | car | time |
/// |----|--------|-----|------|
/// | 1  | 1      | GT3 | 90.0 |
/// | 2  | 2      | GT3 | 89.0 |
/// | 3  | 1      | GT4 | 95.0 |
/// | 4  | 2      | GT4 | 98.0 |
/// | 5  | 1      | GT3 | 88.5 |
pub fn sample_laptimes() -> Vec<LapTime> {
    vec![
        lap(1, 1, "GT3", "Spa", "GP", 90.0),
        lap(2, 2, "GT3", "Spa", "GP", 89.0),
        lap(3, 1, "GT4", "Spa", "GP", 95.0),
        lap(4, 2, "GT4", "Spa", "GP", 98.0),
        lap(5, 1, "GT3", "Spa", "GP", 88.5),
    ]
}

pub fn driver(id: u64, name: &str) -> Driver {
    Driver { id, name: name.to_string(), track_time: 0.0, image_url: None }
}

pub fn controller(id: u64, name: &str) -> Controller {
    Controller {
        id,
        name: name.to_string(),
        ip_address: format!("192.168.1.{}", 10 + id),
        universe: 1,
        color_theme: None,
        idle_effect: None,
        auto_on: false,
        is_available: false,
        state: None,
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}

pub fn snapshot_with_angle(angle: f32) -> TelemetrySnapshot {
    TelemetrySnapshot { steering_wheel_angle: Some(angle), ..Default::default() }
}

/// Snapshot with the player in car index 0
pub fn player_snapshot(car: &str, angle: f32) -> TelemetrySnapshot {
    TelemetrySnapshot {
        steering_wheel_angle: Some(angle),
        driver_info: Some(DriverInfo {
            driver_car_idx: Some(0),
            drivers: vec![CarEntry { car_screen_name: car.to_string(), user_name: "Ana".into() }],
        }),
        is_on_track: Some(true),
        ..Default::default()
    }
}

/// Provider that plays back a fixed script of results, sleeping `delay`
/// before each. Ends with `Ok(None)` once the script runs out.
pub struct ScriptedProvider {
    script: VecDeque<Result<Option<TelemetrySnapshot>>>,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn paced(script: Vec<Result<Option<TelemetrySnapshot>>>, delay: Duration) -> Self {
        Self { script: script.into(), delay }
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for ScriptedProvider {
    async fn next_snapshot(&mut self) -> Result<Option<TelemetrySnapshot>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn tick_rate(&self) -> f64 {
        if self.delay.is_zero() { 60.0 } else { 1.0 / self.delay.as_secs_f64() }
    }
}
