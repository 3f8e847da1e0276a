//! Lap time store transitions

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::Intent;
use crate::StateContainer;
use crate::types::LapTime;

/// Intents accepted by the lap time store.
#[derive(Debug, Clone, PartialEq)]
pub enum LaptimeAction {
    /// A load request has been issued
    LoadLaptimes,
    /// The load request returned; replaces the whole collection
    LoadLaptimesSuccess(Vec<LapTime>),
    /// The load request failed; existing lap times stay visible
    LoadLaptimesFailure(String),
}

impl Intent for LaptimeAction {
    type State = Vec<LapTime>;

    fn name(&self) -> &'static str {
        match self {
            LaptimeAction::LoadLaptimes => "[Laptimes] Load Laptimes",
            LaptimeAction::LoadLaptimesSuccess(_) => "[Laptimes] Load Laptimes Success",
            LaptimeAction::LoadLaptimesFailure(_) => "[Laptimes] Load Laptimes Failure",
        }
    }

    fn reduce(
        self,
        container: StateContainer<Vec<LapTime>>,
        now: DateTime<Utc>,
    ) -> StateContainer<Vec<LapTime>> {
        match self {
            LaptimeAction::LoadLaptimes => container.started(),
            LaptimeAction::LoadLaptimesSuccess(laptimes) => {
                debug!(count = laptimes.len(), "Lap times loaded");
                container.succeeded(laptimes, now)
            }
            LaptimeAction::LoadLaptimesFailure(error) => {
                warn!(%error, stale = container.state.len(), "Lap time load failed");
                container.failed(error, now)
            }
        }
    }
}
