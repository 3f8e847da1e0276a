//! Request-tracking wrapper around store contents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store contents plus the metadata of the request that last touched them.
///
/// `loading` is only true between a start intent and its matching success or
/// failure. `last_updated` is only stamped by success and failure, never by
/// a start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateContainer<T> {
    pub state: T,
    pub error: Option<String>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T: Default> Default for StateContainer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> StateContainer<T> {
    /// Idle container holding `state`
    pub fn new(state: T) -> Self {
        Self { state, error: None, loading: false, last_updated: None }
    }

    /// Mark a request in flight.
    pub fn started(self) -> Self {
        Self { loading: true, ..self }
    }

    /// Replace the contents after a successful request.
    pub fn succeeded(self, state: T, now: DateTime<Utc>) -> Self {
        Self { state, error: None, loading: false, last_updated: Some(now) }
    }

    /// Apply `update` to the contents after a successful request.
    pub fn succeeded_with(self, update: impl FnOnce(T) -> T, now: DateTime<Utc>) -> Self {
        let state = update(self.state);
        Self { state, error: None, loading: false, last_updated: Some(now) }
    }

    /// Record a failed request. The contents are left as they were.
    pub fn failed(self, error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self { error: Some(error.into()), loading: false, last_updated: Some(now), ..self }
    }

    /// Same metadata, different contents. Used by views that derive a
    /// filtered copy of the store.
    pub fn with_state<U>(&self, state: U) -> StateContainer<U> {
        StateContainer {
            state,
            error: self.error.clone(),
            loading: self.loading,
            last_updated: self.last_updated,
        }
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    /// Loaded at least once, successfully or not
    pub fn is_settled(&self) -> bool {
        self.last_updated.is_some() && !self.loading
    }
}
