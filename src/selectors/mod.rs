//! Pure query functions over store contents.
//!
//! Selectors take the store they read as an explicit argument and never
//! mutate it. Lap time views live in [`laptime`]; the driver and controller
//! lookups are small enough to sit here.

mod laptime;

pub use laptime::{
    select_all_laptimes, select_filtered_laptimes, select_filtered_laptimes_with_search,
    select_laptimes_by_search_params, select_laptimes_for_driver, select_laptimes_since,
    select_laptimes_state, select_overall_best_laptimes, select_sorted_laptimes,
};

pub use crate::ordering::select_ordered_laptimes;

use crate::StateContainer;
use crate::types::{Controller, Driver, DriverState};

pub fn select_active_driver(store: &StateContainer<DriverState>) -> Option<&Driver> {
    store.state.active_driver.as_ref()
}

pub fn select_drivers(store: &StateContainer<DriverState>) -> &[Driver] {
    &store.state.drivers
}

pub fn select_driver_by_id(store: &StateContainer<DriverState>, id: u64) -> Option<&Driver> {
    store.state.drivers.iter().find(|driver| driver.id == id)
}

pub fn select_controllers(store: &StateContainer<Vec<Controller>>) -> &StateContainer<Vec<Controller>> {
    store
}

pub fn select_controller_by_id(store: &StateContainer<Vec<Controller>>, id: u64) -> Option<&Controller> {
    store.state.iter().find(|controller| controller.id == id)
}

/// Controllers that answered their last state poll
pub fn select_available_controllers(store: &StateContainer<Vec<Controller>>) -> Vec<&Controller> {
    store.state.iter().filter(|controller| controller.is_available).collect()
}
