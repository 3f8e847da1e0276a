//! Benchmarks for lap time views over a large store
//!
//! Every selector runs on each store change, so view cost bounds how
//! often the dashboard can redraw the lap tables.
//!
//! Run: `cargo bench --bench selectors --features benchmark`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use paddock::selectors::{
    select_filtered_laptimes, select_filtered_laptimes_with_search, select_laptimes_by_search_params,
    select_overall_best_laptimes, select_sorted_laptimes,
};
use paddock::test_utils::{lap, laptime_store};
use paddock::{FilterParams, LapField, LapTime, LaptimeOrder, SearchParam, SortOrder, SortParams};
use std::hint::black_box;

const CARS: [&str; 4] = ["Porsche 911 GT3 R", "BMW M4 GT3", "Mazda MX-5 Cup", "Dallara IR18"];
const TRACKS: [&str; 3] = ["Spa-Francorchamps", "Laguna Seca", "Monza"];

/// `n` laps spread over 8 drivers and 12 car/track combinations
fn season(n: usize) -> Vec<LapTime> {
    (0..n as u64)
        .map(|i| {
            let car = CARS[(i % 4) as usize];
            let track = TRACKS[(i / 4 % 3) as usize];
            let time = 90.0 + ((i * 7919) % 4000) as f64 / 100.0;
            lap(i + 1, i % 8 + 1, car, track, "GP", time)
        })
        .collect()
}

fn bench_sorting(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_laptimes");

    for size in [100usize, 1_000, 10_000] {
        let store = laptime_store(season(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("time_asc", size), &store, |b, store| {
            let params = SortParams::new(LapField::Time, SortOrder::Asc);
            b.iter(|| black_box(select_sorted_laptimes(black_box(store), &params)))
        });

        group.bench_with_input(BenchmarkId::new("leaderboard", size), &store, |b, store| {
            let order = LaptimeOrder::leaderboard();
            b.iter(|| black_box(order.apply(black_box(&store.state))))
        });
    }

    group.finish();
}

fn bench_best_laps(c: &mut Criterion) {
    let mut group = c.benchmark_group("overall_best_laptimes");

    for size in [100usize, 1_000, 10_000] {
        let store = laptime_store(season(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| black_box(select_overall_best_laptimes(black_box(store))))
        });
    }

    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let store = laptime_store(season(10_000));
    let search = vec![
        SearchParam::new(LapField::Car, "BMW M4 GT3"),
        SearchParam::new(LapField::TrackName, "Monza"),
    ];
    let params = FilterParams {
        sort_params: SortParams::new(LapField::Time, SortOrder::Desc),
        search_params: search.clone(),
        show_for_driver_id: Some(3),
    };

    let mut group = c.benchmark_group("filtered_laptimes");
    group.throughput(Throughput::Elements(store.state.len() as u64));

    group.bench_function("search_params", |b| {
        b.iter(|| black_box(select_laptimes_by_search_params(black_box(&store), &search)))
    });

    group.bench_function("driver_table", |b| {
        b.iter(|| black_box(select_filtered_laptimes(black_box(&store), &params)))
    });

    group.bench_function("driver_table_with_search", |b| {
        b.iter(|| black_box(select_filtered_laptimes_with_search(black_box(&store), &params)))
    });

    group.finish();
}

criterion_group!(benches, bench_sorting, bench_best_laps, bench_filtering);
criterion_main!(benches);
