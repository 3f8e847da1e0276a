//! Derived lap time views
//!
//! Every selector borrows the lap time store and returns a fresh collection;
//! the canonical collection is never reordered or filtered in place.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::StateContainer;
use crate::types::{FilterParams, LapTime, SearchParam, SortParams};

type LaptimeStore = StateContainer<Vec<LapTime>>;

/// The whole store, metadata included
pub fn select_laptimes_state(store: &LaptimeStore) -> &LaptimeStore {
    store
}

/// Every lap time in load order
pub fn select_all_laptimes(store: &LaptimeStore) -> &[LapTime] {
    &store.state
}

/// Lap times set by one driver, in load order, with the store's metadata.
pub fn select_laptimes_for_driver(store: &LaptimeStore, driver_id: u64) -> LaptimeStore {
    let laps = store.state.iter().filter(|lap| lap.driver.id == driver_id).cloned().collect();
    store.with_state(laps)
}

/// Lap times set strictly after `since`.
pub fn select_laptimes_since(store: &LaptimeStore, since: DateTime<Utc>) -> Vec<LapTime> {
    store.state.iter().filter(|lap| lap.set_at > since).cloned().collect()
}

/// Lap times matching every search parameter. No parameters means every lap.
pub fn select_laptimes_by_search_params(
    store: &LaptimeStore,
    search_params: &[SearchParam],
) -> Vec<LapTime> {
    search_indices(&store.state, search_params).map(|i| store.state[i].clone()).collect()
}

/// All lap times, stably sorted on one field.
pub fn select_sorted_laptimes(store: &LaptimeStore, sort_params: &SortParams) -> LaptimeStore {
    let laps = sorted_indices(&store.state, sort_params)
        .into_iter()
        .map(|i| store.state[i].clone())
        .collect();
    store.with_state(laps)
}

/// The fastest lap for every car, track and layout combination.
///
/// Laps that tie the combination's best time are all kept, whoever set them.
/// NaN times never count as a best.
pub fn select_overall_best_laptimes(store: &LaptimeStore) -> LaptimeStore {
    let mut best: HashMap<(&str, &str, &str), f64> = HashMap::new();
    for lap in store.state.iter().filter(|lap| !lap.time.is_nan()) {
        best.entry(combo(lap))
            .and_modify(|time| *time = time.min(lap.time))
            .or_insert(lap.time);
    }

    let laps = store
        .state
        .iter()
        .filter(|lap| best.get(&combo(lap)) == Some(&lap.time))
        .cloned()
        .collect();
    store.with_state(laps)
}

/// The dashboard's filtered lap time table.
///
/// Takes the selected driver's laps, drops repeated ids (first occurrence
/// wins) and orders them as [`select_sorted_laptimes`] would.
///
/// The search parameters do not narrow or extend the result. Laps matching
/// the search are merged into a copy that is then discarded, so only the
/// driver's laps come back. That behaviour is what the dashboard has always
/// shown and is kept until the intended semantics are confirmed; see
/// [`select_filtered_laptimes_with_search`] for the union.
pub fn select_filtered_laptimes(store: &LaptimeStore, filter_params: &FilterParams) -> Vec<LapTime> {
    let laps = &store.state;
    let mut seen = HashSet::new();
    let combined: Vec<usize> = driver_indices(laps, filter_params.show_for_driver_id)
        .filter(|&i| seen.insert(laps[i].id))
        .collect();

    order_by_sort_rank(laps, combined, &filter_params.sort_params)
}

/// The filtered table with search results merged in: the driver's laps
/// followed by any laps matching the search, de-duplicated by id and ordered
/// as [`select_sorted_laptimes`] would.
pub fn select_filtered_laptimes_with_search(
    store: &LaptimeStore,
    filter_params: &FilterParams,
) -> Vec<LapTime> {
    let laps = &store.state;
    let mut seen = HashSet::new();
    let combined: Vec<usize> = driver_indices(laps, filter_params.show_for_driver_id)
        .chain(search_indices(laps, &filter_params.search_params))
        .filter(|&i| seen.insert(laps[i].id))
        .collect();

    order_by_sort_rank(laps, combined, &filter_params.sort_params)
}

fn combo(lap: &LapTime) -> (&str, &str, &str) {
    (&lap.car, &lap.track_name, &lap.track_config)
}

fn driver_indices(laps: &[LapTime], driver_id: Option<u64>) -> impl Iterator<Item = usize> + '_ {
    laps.iter()
        .enumerate()
        .filter(move |(_, lap)| Some(lap.driver.id) == driver_id)
        .map(|(i, _)| i)
}

fn search_indices<'a>(
    laps: &'a [LapTime],
    search_params: &'a [SearchParam],
) -> impl Iterator<Item = usize> + 'a {
    laps.iter()
        .enumerate()
        .filter(move |(_, lap)| search_params.iter().all(|param| param.matches(lap)))
        .map(|(i, _)| i)
}

fn sorted_indices(laps: &[LapTime], sort_params: &SortParams) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..laps.len()).collect();
    // sort_by is stable
    indices.sort_by(|&a, &b| sort_params.compare(&laps[a], &laps[b]));
    indices
}

fn order_by_sort_rank(
    laps: &[LapTime],
    mut selected: Vec<usize>,
    sort_params: &SortParams,
) -> Vec<LapTime> {
    let mut rank = vec![0usize; laps.len()];
    for (position, index) in sorted_indices(laps, sort_params).into_iter().enumerate() {
        rank[index] = position;
    }
    selected.sort_by_key(|&i| rank[i]);
    selected.into_iter().map(|i| laps[i].clone()).collect()
}
