//! Lap-time store, derived views and live telemetry feed for sim rig dashboards.
//!
//! Paddock is the client-side core of the We Race sim rig dashboard: it keeps
//! the lap times, driver profiles and lighting controllers the rig API serves,
//! derives the views the dashboard shows from them, and carries the live
//! telemetry stream to the widgets that render it.
//!
//! # Features
//!
//! - **Explicit state**: every store is a [`StateContainer`] transitioned by pure intent functions
//! - **Derived views**: selectors never touch the canonical collection
//! - **Latest-value telemetry**: slow widgets skip to the newest snapshot instead of queueing
//!
//! # Quick Start
//!
//! ```rust
//! use paddock::selectors::{select_laptimes_by_search_params, select_sorted_laptimes};
//! use paddock::store::{LaptimeAction, Store};
//! use paddock::{LapField, SearchParam, SortOrder, SortParams, payload};
//!
//! let body = r#"[
//!   {"id": 1, "driver": {"id": 1, "name": "Ana"}, "car": "GT3", "trackName": "Spa",
//!    "trackConfig": "GP", "time": 90.5, "setAt": "2024-05-11T18:22:03Z"},
//!   {"id": 2, "driver": {"id": 2, "name": "Ben"}, "car": "GT4", "trackName": "Spa",
//!    "trackConfig": "GP", "time": 97.1, "setAt": "2024-05-11T18:25:40Z"}
//! ]"#;
//!
//! let store = Store::new();
//! store.dispatch(LaptimeAction::LoadLaptimes);
//! let state = store.dispatch(payload::laptimes_action(Ok(body)));
//!
//! let gt3 = select_laptimes_by_search_params(
//!     &state.laptimes,
//!     &[SearchParam::new(LapField::Car, "GT3")],
//! );
//! assert_eq!(gt3.len(), 1);
//!
//! let slowest_first =
//!     select_sorted_laptimes(&state.laptimes, &SortParams::new(LapField::Time, SortOrder::Desc));
//! assert_eq!(slowest_first.state[0].id, 2);
//! ```
//!
//! ## Live telemetry
//!
//! ```rust,no_run
//! use paddock::display::{WheelDisplay, attach};
//! use paddock::{TelemetryConnection, UpdateRate};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> paddock::Result<()> {
//! let connection = TelemetryConnection::replay(Vec::new(), 60.0)?;
//! let wheel = attach(
//!     connection.subscribe(UpdateRate::Max(30)),
//!     WheelDisplay::default(),
//!     connection.cancellation(),
//! );
//! let wheel = wheel.await.expect("view task panicked");
//! println!("{}", wheel.transform());
//! # Ok(())
//! # }
//! ```

// Core types and error handling
mod error;
mod state;
pub mod types;

// Stores and views
pub mod ordering;
pub mod selectors;
pub mod store;

// API boundary
pub mod config;
pub mod payload;

// Live telemetry
pub mod connection;
pub mod display;
pub mod feed;
pub mod provider;
pub mod providers;
pub mod stream;
pub mod telemetry;

pub mod logging;

#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

// Core exports
pub use error::*;
pub use state::StateContainer;
pub use types::*;

// Main API exports
pub use config::{DashboardConfig, Endpoint, Protocol};
pub use connection::TelemetryConnection;
pub use ordering::LaptimeOrder;
pub use provider::SnapshotProvider;
pub use store::{AppAction, AppState, Store};
pub use telemetry::TelemetrySnapshot;
