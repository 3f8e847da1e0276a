//! Multi-key lap time ordering.
//!
//! The leaderboard endpoints accept an order with an optional direction per
//! field. Fields that are set apply in a fixed priority: driver name, driver
//! id, car, track name, track config, time, set-at. Later fields only break
//! ties left by earlier ones.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::StateContainer;
use crate::types::{LapField, LapTime, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaptimeOrder {
    pub driver_name: Option<SortOrder>,
    pub driver_id: Option<SortOrder>,
    pub car: Option<SortOrder>,
    pub track_name: Option<SortOrder>,
    pub track_config: Option<SortOrder>,
    pub time: Option<SortOrder>,
    pub set_at: Option<SortOrder>,
}

impl LaptimeOrder {
    /// Leaderboard default: per combination, fastest first
    pub fn leaderboard() -> Self {
        Self {
            car: Some(SortOrder::Asc),
            track_name: Some(SortOrder::Asc),
            track_config: Some(SortOrder::Asc),
            time: Some(SortOrder::Asc),
            ..Self::default()
        }
    }

    /// Sort keys in the order they apply
    pub fn keys(&self) -> Vec<(LapField, SortOrder)> {
        [
            (LapField::DriverName, self.driver_name),
            (LapField::DriverId, self.driver_id),
            (LapField::Car, self.car),
            (LapField::TrackName, self.track_name),
            (LapField::TrackConfig, self.track_config),
            (LapField::Time, self.time),
            (LapField::SetAt, self.set_at),
        ]
        .into_iter()
        .filter_map(|(field, order)| order.map(|order| (field, order)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn compare(&self, a: &LapTime, b: &LapTime) -> Ordering {
        compare_by_keys(&self.keys(), a, b)
    }

    /// Stably sorted copy of `laps`
    pub fn apply(&self, laps: &[LapTime]) -> Vec<LapTime> {
        let keys = self.keys();
        let mut ordered = laps.to_vec();
        if !keys.is_empty() {
            ordered.sort_by(|a, b| compare_by_keys(&keys, a, b));
        }
        ordered
    }
}

/// First non-equal key decides
fn compare_by_keys(keys: &[(LapField, SortOrder)], a: &LapTime, b: &LapTime) -> Ordering {
    keys.iter()
        .map(|(field, order)| order.apply(field.compare(a, b)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// All lap times ordered by `order`, with the store's metadata.
pub fn select_ordered_laptimes(
    store: &StateContainer<Vec<LapTime>>,
    order: &LaptimeOrder,
) -> StateContainer<Vec<LapTime>> {
    store.with_state(order.apply(&store.state))
}
