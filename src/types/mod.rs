//! Core data types.
//!
//! - [`LapTime`] is one completed lap, addressed field-by-field through [`LapField`]
//! - [`SortParams`], [`SearchParam`] and [`FilterParams`] parameterize the lap time views
//! - [`Driver`] and [`Controller`] back the driver profile and lighting stores
//! - [`UpdateRate`] caps how often live telemetry subscribers are woken
//!
//! All types serialize with the sim rig API's camelCase field names.

mod controller;
mod driver;
mod laptime;
mod query;
mod update_rate;

pub use controller::{Controller, ControllerDraft, ControllerState};
pub use driver::{Driver, DriverState};
pub use laptime::{DriverRef, FieldValue, LapField, LapTime};
pub use query::{FilterParams, SearchParam, SortOrder, SortParams};
pub use update_rate::UpdateRate;
