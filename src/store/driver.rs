//! Driver profile store transitions

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::Intent;
use crate::StateContainer;
use crate::types::{Driver, DriverState};

/// Intents accepted by the driver store.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverAction {
    LoadActiveDriver,
    LoadActiveDriverSuccess(Driver),
    LoadActiveDriverFailure(String),
    LoadDrivers,
    LoadDriversSuccess(Vec<Driver>),
    LoadDriversFailure(String),
    UploadDriverAvatar { driver_id: u64 },
    UploadDriverAvatarSuccess { driver_id: u64, image_url: String },
    UploadDriverAvatarFailure(String),
}

impl Intent for DriverAction {
    type State = DriverState;

    fn name(&self) -> &'static str {
        match self {
            DriverAction::LoadActiveDriver => "[LoadActiveDriver] Load Active Driver",
            DriverAction::LoadActiveDriverSuccess(_) => {
                "[LoadActiveDriver] Load Active Driver Success"
            }
            DriverAction::LoadActiveDriverFailure(_) => {
                "[LoadActiveDriver] Load Active Driver Failure"
            }
            DriverAction::LoadDrivers => "[LoadDrivers] Load Drivers",
            DriverAction::LoadDriversSuccess(_) => "[LoadDrivers] Load Drivers Success",
            DriverAction::LoadDriversFailure(_) => "[LoadDrivers] Load Drivers Failure",
            DriverAction::UploadDriverAvatar { .. } => "[UpdateDriverProfile] Upload Driver Avatar",
            DriverAction::UploadDriverAvatarSuccess { .. } => {
                "[UpdateDriverProfile] Upload Driver Avatar Success"
            }
            DriverAction::UploadDriverAvatarFailure(_) => {
                "[UpdateDriverProfile] Upload Driver Avatar Failure"
            }
        }
    }

    fn reduce(
        self,
        container: StateContainer<DriverState>,
        now: DateTime<Utc>,
    ) -> StateContainer<DriverState> {
        match self {
            DriverAction::LoadActiveDriver
            | DriverAction::LoadDrivers
            | DriverAction::UploadDriverAvatar { .. } => container.started(),

            DriverAction::LoadActiveDriverSuccess(driver) => {
                debug!(driver_id = driver.id, name = %driver.name, "Active driver loaded");
                container.succeeded_with(
                    |state| DriverState { active_driver: Some(driver), ..state },
                    now,
                )
            }
            DriverAction::LoadDriversSuccess(drivers) => {
                debug!(count = drivers.len(), "Drivers loaded");
                container.succeeded_with(|state| DriverState { drivers, ..state }, now)
            }
            DriverAction::UploadDriverAvatarSuccess { driver_id, image_url } => {
                debug!(driver_id, %image_url, "Driver avatar uploaded");
                container.succeeded_with(|state| set_avatar(state, driver_id, image_url), now)
            }

            DriverAction::LoadActiveDriverFailure(error)
            | DriverAction::LoadDriversFailure(error)
            | DriverAction::UploadDriverAvatarFailure(error) => {
                warn!(%error, "Driver request failed");
                container.failed(error, now)
            }
        }
    }
}

fn set_avatar(mut state: DriverState, driver_id: u64, image_url: String) -> DriverState {
    for driver in state.drivers.iter_mut().filter(|d| d.id == driver_id) {
        driver.image_url = Some(image_url.clone());
    }
    if let Some(active) = state.active_driver.as_mut().filter(|d| d.id == driver_id) {
        active.image_url = Some(image_url);
    }
    state
}
