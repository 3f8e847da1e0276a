//! Telemetry subscribers behind the dashboard widgets.
//!
//! Each widget keeps the state it renders from and updates it per snapshot.
//! [`attach`] drives a widget from a subscription: every handler call runs to
//! completion before the next snapshot is taken, and cancelling the token is
//! how a widget unsubscribes on teardown.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::telemetry::TelemetrySnapshot;

/// Message shown while the rig streams empty snapshots
pub const NO_DATA_MESSAGE: &str = "No data available";

/// A widget fed by live telemetry
pub trait TelemetryView: Send + 'static {
    fn on_snapshot(&mut self, snapshot: &TelemetrySnapshot);

    /// The subscription ended or was cancelled
    fn on_detach(&mut self) {}
}

/// Drive `view` from `snapshots` until the stream ends or `cancel` fires.
///
/// The handle resolves to the view in its final state.
pub fn attach<S, V>(snapshots: S, mut view: V, cancel: CancellationToken) -> JoinHandle<V>
where
    S: Stream<Item = Arc<TelemetrySnapshot>> + Send + 'static,
    V: TelemetryView,
{
    tokio::spawn(async move {
        let mut snapshots = Box::pin(snapshots);
        let mut delivered = 0u64;
        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(delivered, "View unsubscribed");
                    break;
                }
                next = snapshots.next() => next,
            };
            match next {
                Some(snapshot) => {
                    delivered += 1;
                    trace!(delivered, "Delivering snapshot");
                    view.on_snapshot(&snapshot);
                }
                None => {
                    debug!(delivered, "Subscription ended");
                    break;
                }
            }
        }
        view.on_detach();
        view
    })
}

/// Whether the dashboard has live data to show
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStatus {
    connected: bool,
    error: Option<String>,
}

impl DashboardStatus {
    pub fn data_available(&self) -> bool {
        self.connected && self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl TelemetryView for DashboardStatus {
    fn on_snapshot(&mut self, snapshot: &TelemetrySnapshot) {
        self.connected = true;
        self.error = snapshot.is_empty().then(|| NO_DATA_MESSAGE.to_string());
    }

    fn on_detach(&mut self) {
        self.connected = false;
    }
}

/// Steering wheel widget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelDisplay {
    pub driver_index: Option<usize>,
    pub car: Option<String>,
    /// Only recomputed when the car changes
    pub wheel_image: Option<String>,
    /// Radians, already negated for screen rotation
    pub rotation: f32,
    pub car_changes: u32,
}

impl WheelDisplay {
    /// CSS transform for the wheel graphic
    pub fn transform(&self) -> String {
        format!("rotate({}rad)", self.rotation)
    }
}

/// Asset id for a car's wheel graphic, e.g. `porsche-911-gt3-r`
pub fn wheel_image_for_car(car: &str) -> String {
    let mut slug = String::with_capacity(car.len());
    for c in car.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

impl TelemetryView for WheelDisplay {
    fn on_snapshot(&mut self, snapshot: &TelemetrySnapshot) {
        if snapshot.is_empty() {
            return;
        }

        if let Some(index) = snapshot.driver_info.as_ref().and_then(|info| info.driver_car_idx) {
            self.driver_index = Some(index);
        }

        if let Some(entry) = snapshot.player_car() {
            if self.car.as_deref() != Some(entry.car_screen_name.as_str()) {
                debug!(car = %entry.car_screen_name, "Car changed");
                self.car = Some(entry.car_screen_name.clone());
                self.wheel_image = Some(wheel_image_for_car(&entry.car_screen_name));
                self.car_changes += 1;
            }
        }

        if let Some(angle) = snapshot.steering_wheel_angle {
            self.rotation = -angle;
        }
    }
}
