//! Application state and the intents that transition it.
//!
//! Every store is a [`StateContainer`] and every transition is a pure
//! function of `(container, intent, now)`. [`AppState`] groups the three
//! stores and routes an [`AppAction`] to the one it belongs to.
//!
//! [`Store`] is the only stateful piece: it stamps intents with its [`Clock`],
//! reduces, and publishes the new state on a watch channel so subscribers
//! always see the latest state (intermediate states may be skipped).
//!
//! ```rust
//! use paddock::store::{LaptimeAction, Store};
//! use paddock::selectors::select_all_laptimes;
//!
//! let store = Store::new();
//! store.dispatch(LaptimeAction::LoadLaptimes);
//! assert!(store.snapshot().laptimes.loading);
//!
//! store.dispatch(LaptimeAction::LoadLaptimesSuccess(Vec::new()));
//! assert!(select_all_laptimes(&store.snapshot().laptimes).is_empty());
//! ```

mod controller;
mod driver;
mod laptime;

pub use controller::ControllerAction;
pub use driver::DriverAction;
pub use laptime::LaptimeAction;

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt, future};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::StateContainer;
use crate::types::{Controller, DriverState, LapTime};

/// A named request to transition one store.
pub trait Intent: std::fmt::Debug {
    /// Contents of the store this intent applies to
    type State;

    /// Stable intent name, used in logs
    fn name(&self) -> &'static str;

    /// Pure transition function.
    fn reduce(
        self,
        container: StateContainer<Self::State>,
        now: DateTime<Utc>,
    ) -> StateContainer<Self::State>;
}

/// Source of the timestamps written to `last_updated`.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Complete client state
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AppState {
    pub laptimes: StateContainer<Vec<LapTime>>,
    pub drivers: StateContainer<DriverState>,
    pub controllers: StateContainer<Vec<Controller>>,
}

/// Any intent, tagged with the store it belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Laptime(LaptimeAction),
    Driver(DriverAction),
    Controller(ControllerAction),
}

impl AppAction {
    pub fn name(&self) -> &'static str {
        match self {
            AppAction::Laptime(a) => a.name(),
            AppAction::Driver(a) => a.name(),
            AppAction::Controller(a) => a.name(),
        }
    }
}

impl From<LaptimeAction> for AppAction {
    fn from(action: LaptimeAction) -> Self {
        AppAction::Laptime(action)
    }
}

impl From<DriverAction> for AppAction {
    fn from(action: DriverAction) -> Self {
        AppAction::Driver(action)
    }
}

impl From<ControllerAction> for AppAction {
    fn from(action: ControllerAction) -> Self {
        AppAction::Controller(action)
    }
}

impl AppState {
    /// Apply one intent. Stores the intent does not address are moved through untouched.
    pub fn reduce(self, action: AppAction, now: DateTime<Utc>) -> Self {
        match action {
            AppAction::Laptime(a) => Self { laptimes: a.reduce(self.laptimes, now), ..self },
            AppAction::Driver(a) => Self { drivers: a.reduce(self.drivers, now), ..self },
            AppAction::Controller(a) => {
                Self { controllers: a.reduce(self.controllers, now), ..self }
            }
        }
    }
}

/// Owns the current [`AppState`] and notifies subscribers on every dispatch.
pub struct Store<C = SystemClock> {
    clock: C,
    state: watch::Sender<Arc<AppState>>,
}

impl Default for Store<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl Store<SystemClock> {
    /// Empty store on the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Store<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_state(AppState::default(), clock)
    }

    pub fn with_state(state: AppState, clock: C) -> Self {
        let (state, _) = watch::channel(Arc::new(state));
        Self { clock, state }
    }

    /// Reduce `action` into the current state and publish the result.
    pub fn dispatch(&self, action: impl Into<AppAction>) -> Arc<AppState> {
        let action = action.into();
        let now = self.clock.now();
        debug!(intent = action.name(), "Dispatching");

        let mut published = None;
        self.state.send_modify(|current| {
            let next = Arc::new(current.as_ref().clone().reduce(action, now));
            published = Some(Arc::clone(&next));
            *current = next;
        });

        // send_modify always runs the closure
        published.unwrap_or_else(|| self.snapshot())
    }

    /// Current state
    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    /// Run a selector against the current state.
    pub fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        selector(&self.state.borrow())
    }

    /// Stream of states: the current one immediately, then the latest after
    /// each dispatch. A slow consumer only sees the newest state.
    pub fn subscribe(&self) -> impl Stream<Item = Arc<AppState>> + 'static {
        WatchStream::new(self.state.subscribe())
    }

    /// Stream of a derived view that only yields when the view changes.
    pub fn view<T, F>(&self, selector: F) -> impl Stream<Item = T> + 'static
    where
        T: PartialEq + Clone + Send + 'static,
        F: Fn(&AppState) -> T + Send + 'static,
    {
        let mut last: Option<T> = None;
        self.subscribe().filter_map(move |state| {
            let view = selector(&state);
            let changed = last.as_ref() != Some(&view);
            if changed {
                last = Some(view.clone());
            }
            future::ready(changed.then_some(view))
        })
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::select_laptimes_for_driver;
    use crate::test_utils::{FixedClock, at, driver, lap};
    use futures::StreamExt;
    use std::time::Duration;

    #[test]
    fn reduce_routes_to_one_store() {
        let state = AppState::default()
            .reduce(LaptimeAction::LoadLaptimes.into(), at(1))
            .reduce(DriverAction::LoadActiveDriverSuccess(driver(1, "Ana")).into(), at(2));

        assert!(state.laptimes.loading);
        assert_eq!(state.laptimes.last_updated, None);
        assert!(!state.drivers.loading);
        assert_eq!(state.drivers.last_updated, Some(at(2)));
        assert_eq!(state.controllers, StateContainer::default());
    }

    #[test]
    fn dispatch_stamps_with_clock() {
        let clock = FixedClock::new(at(100));
        let store = Store::with_clock(clock.clone());

        store.dispatch(LaptimeAction::LoadLaptimes);
        clock.advance(chrono::Duration::seconds(5));
        let state = store.dispatch(LaptimeAction::LoadLaptimesSuccess(vec![lap(
            1, 1, "GT3", "Spa", "GP", 90.0,
        )]));

        assert_eq!(state.laptimes.last_updated, Some(at(105)));
        assert_eq!(store.snapshot(), state);
    }

    #[tokio::test]
    async fn subscribers_see_current_then_latest() {
        let store = Store::with_clock(FixedClock::new(at(0)));
        let mut states = Box::pin(store.subscribe());

        let first = states.next().await.unwrap();
        assert!(!first.laptimes.loading);

        store.dispatch(LaptimeAction::LoadLaptimes);
        store.dispatch(LaptimeAction::LoadLaptimesFailure("offline".into()));

        // Latest-value delivery: the intermediate loading state is skipped
        let latest = tokio::time::timeout(Duration::from_secs(1), states.next())
            .await
            .unwrap()
            .unwrap();
        assert!(!latest.laptimes.loading);
        assert_eq!(latest.laptimes.error.as_deref(), Some("offline"));
    }

    #[test]
    fn subscriber_count_tracks_live_streams() {
        let store = Store::with_clock(FixedClock::new(at(0)));
        assert_eq!(store.subscriber_count(), 0);

        let states = store.subscribe();
        let view = store.view(|s| s.laptimes.loading);
        assert_eq!(store.subscriber_count(), 2);

        drop(states);
        drop(view);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn view_only_yields_on_change() {
        let store = Store::with_clock(FixedClock::new(at(0)));
        let mut mine = Box::pin(store.view(|s| select_laptimes_for_driver(&s.laptimes, 1).state));

        assert_eq!(mine.next().await, Some(Vec::new()));

        // Another driver's lap leaves driver 1's view unchanged
        store.dispatch(LaptimeAction::LoadLaptimesSuccess(vec![lap(1, 2, "GT3", "Spa", "GP", 90.0)]));
        tokio::task::yield_now().await;
        let laps = vec![lap(1, 2, "GT3", "Spa", "GP", 90.0), lap(2, 1, "GT3", "Spa", "GP", 91.0)];
        store.dispatch(LaptimeAction::LoadLaptimesSuccess(laps));

        let next = tokio::time::timeout(Duration::from_secs(1), mine.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.iter().map(|l| l.id).collect::<Vec<_>>(), vec![2]);
    }
}
