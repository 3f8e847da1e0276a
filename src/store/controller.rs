//! Lighting controller store transitions

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::Intent;
use crate::StateContainer;
use crate::types::{Controller, ControllerState};

/// Intents accepted by the controller store.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerAction {
    LoadControllers,
    LoadControllersSuccess(Vec<Controller>),
    LoadControllersFailure(String),
    UpdateControllerState { controller_id: u64 },
    UpdateControllerStateSuccess { controller_id: u64, state: ControllerState },
    /// The controller did not answer; marks it unavailable without touching `error`
    UpdateControllerStateFailure { controller_id: u64 },
    CreateController,
    CreateControllerSuccess(Controller),
    CreateControllerFailure(String),
    UpdateController,
    UpdateControllerSuccess(Controller),
    UpdateControllerFailure(String),
    DeleteController,
    DeleteControllerSuccess(Controller),
    DeleteControllerFailure(String),
}

impl Intent for ControllerAction {
    type State = Vec<Controller>;

    fn name(&self) -> &'static str {
        match self {
            ControllerAction::LoadControllers => "[Controllers] Load Controllers",
            ControllerAction::LoadControllersSuccess(_) => "[Controllers] Load Controllers Success",
            ControllerAction::LoadControllersFailure(_) => "[Controllers] Load Controllers Failure",
            ControllerAction::UpdateControllerState { .. } => "[Controllers] Update Controller State",
            ControllerAction::UpdateControllerStateSuccess { .. } => {
                "[Controllers] Update Controller State Success"
            }
            ControllerAction::UpdateControllerStateFailure { .. } => {
                "[Controllers] Update Controller State Failure"
            }
            ControllerAction::CreateController => "[Controllers] Create Controller",
            ControllerAction::CreateControllerSuccess(_) => "[Controllers] Create Controller Success",
            ControllerAction::CreateControllerFailure(_) => "[Controllers] Create Controller Failure",
            ControllerAction::UpdateController => "[Controllers] Update Controller",
            ControllerAction::UpdateControllerSuccess(_) => "[Controllers] Update Controller Success",
            ControllerAction::UpdateControllerFailure(_) => "[Controllers] Update Controller Failure",
            ControllerAction::DeleteController => "[Controllers] Delete Controller",
            ControllerAction::DeleteControllerSuccess(_) => "[Controllers] Delete Controller Success",
            ControllerAction::DeleteControllerFailure(_) => "[Controllers] Delete Controller Failure",
        }
    }

    fn reduce(
        self,
        container: StateContainer<Vec<Controller>>,
        now: DateTime<Utc>,
    ) -> StateContainer<Vec<Controller>> {
        match self {
            ControllerAction::LoadControllers
            | ControllerAction::UpdateControllerState { .. }
            | ControllerAction::CreateController
            | ControllerAction::UpdateController
            | ControllerAction::DeleteController => container.started(),

            ControllerAction::LoadControllersSuccess(controllers) => {
                debug!(count = controllers.len(), "Controllers loaded");
                container.succeeded(controllers, now)
            }
            ControllerAction::UpdateControllerStateSuccess { controller_id, state } => container
                .succeeded_with(
                    |controllers| {
                        map_controller(controllers, controller_id, |c| Controller {
                            is_available: true,
                            state: Some(state),
                            ..c
                        })
                    },
                    now,
                ),
            ControllerAction::UpdateControllerStateFailure { controller_id } => {
                debug!(controller_id, "Controller unreachable");
                let controllers = map_controller(container.state, controller_id, |c| Controller {
                    is_available: false,
                    state: None,
                    ..c
                });
                StateContainer {
                    state: controllers,
                    loading: false,
                    last_updated: Some(now),
                    error: container.error,
                }
            }
            ControllerAction::CreateControllerSuccess(controller) => {
                debug!(controller_id = controller.id, "Controller created");
                container.succeeded_with(
                    |mut controllers| {
                        controllers.push(controller);
                        controllers
                    },
                    now,
                )
            }
            ControllerAction::UpdateControllerSuccess(controller) => {
                let id = controller.id;
                container.succeeded_with(|controllers| map_controller(controllers, id, |_| controller), now)
            }
            ControllerAction::DeleteControllerSuccess(controller) => container.succeeded_with(
                |mut controllers| {
                    controllers.retain(|c| c.id != controller.id);
                    controllers
                },
                now,
            ),

            ControllerAction::LoadControllersFailure(error)
            | ControllerAction::CreateControllerFailure(error)
            | ControllerAction::UpdateControllerFailure(error)
            | ControllerAction::DeleteControllerFailure(error) => {
                warn!(%error, "Controller request failed");
                container.failed(error, now)
            }
        }
    }
}

/// Replace the first controller with `id`. Ids are unique per rig.
fn map_controller(
    mut controllers: Vec<Controller>,
    id: u64,
    update: impl FnOnce(Controller) -> Controller,
) -> Vec<Controller> {
    if let Some(index) = controllers.iter().position(|c| c.id == id) {
        let current = controllers.remove(index);
        controllers.insert(index, update(current));
    }
    controllers
}
