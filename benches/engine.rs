// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 The staybook-rs Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for the reservation engine.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded request processing and conflict checking
//! - Calendar grid construction (cold and cached)
//! - Pricing resolution against layered rule stacks
//! - Multi-threaded booking across properties

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rayon::prelude::*;
use rust_decimal_macros::dec;
use staybook_rs::{
    DateRange, Engine, EngineConfig, FixedClock, Property, PropertyId, UserId,
};
use std::sync::Arc;

const OWNER: UserId = UserId(1000);

// =============================================================================
// Helper Functions
// =============================================================================

fn today() -> NaiveDate {
    "2025-01-01".parse().unwrap()
}

fn range(offset: u64, nights: u64) -> DateRange {
    let start = today() + Days::new(offset + 1);
    DateRange::new(start, start + Days::new(nights)).unwrap()
}

fn bench_engine(num_properties: u32) -> Engine {
    let engine = Engine::with_clock(
        Arc::new(FixedClock::new(today())),
        EngineConfig::default(),
    );
    for id in 1..=num_properties {
        engine.register_property(Property::new(PropertyId(id), OWNER, dec!(100)));
    }
    engine
}

/// Engine with a seasonal window, a weekend rule, and scattered overrides,
/// so price resolution has a realistic rule stack to scan.
fn priced_engine() -> Engine {
    let engine = bench_engine(1);
    engine
        .set_seasonal_rule(PropertyId(1), OWNER, range(150, 60), 150)
        .unwrap();
    engine
        .set_weekend_rule(PropertyId(1), OWNER, range(0, 365), 120)
        .unwrap();
    for week in 0..20u64 {
        engine
            .set_price_override(PropertyId(1), OWNER, range(week * 14, 2), dec!(85))
            .unwrap();
    }
    engine
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_request(c: &mut Criterion) {
    c.bench_function("single_request", |b| {
        b.iter(|| {
            let engine = bench_engine(1);
            let r = range(0, 3);
            engine
                .create_reservation(PropertyId(1), UserId(1), black_box(r.start), r.end)
                .unwrap();
        })
    });
}

fn bench_request_and_approve(c: &mut Criterion) {
    c.bench_function("request_and_approve", |b| {
        b.iter(|| {
            let engine = bench_engine(1);
            let r = range(0, 3);
            let reservation = engine
                .create_reservation(PropertyId(1), UserId(1), r.start, r.end)
                .unwrap();
            engine.approve(black_box(reservation.id), OWNER).unwrap();
        })
    });
}

fn bench_request_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_throughput");

    for count in [100, 1_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let engine = bench_engine(1);
                for i in 0..count {
                    // Disjoint one-night stays, so every request lands.
                    let r = range(i as u64, 1);
                    engine
                        .create_reservation(PropertyId(1), UserId(i as u32), r.start, r.end)
                        .unwrap();
                }
                black_box(&engine);
            })
        });
    }
    group.finish();
}

/// Cost of the conflict scan as the timeline fills up.
fn bench_conflict_check_with_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflict_check_with_history");

    for history in [10, 100, 1_000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(history),
            history,
            |b, &history| {
                let engine = bench_engine(1);
                for i in 0..history {
                    let r = range(i as u64 * 2, 1);
                    engine
                        .create_reservation(PropertyId(1), UserId(i as u32), r.start, r.end)
                        .unwrap();
                }
                // Probe a range that overlaps an existing reservation.
                let probe = range(history as u64, 3);
                b.iter(|| {
                    let _ = engine.create_reservation(
                        PropertyId(1),
                        UserId(9999),
                        black_box(probe.start),
                        probe.end,
                    );
                })
            },
        );
    }
    group.finish();
}

// =============================================================================
// Pricing Benchmarks
// =============================================================================

fn bench_resolve_price(c: &mut Criterion) {
    let engine = priced_engine();
    let date = today() + Days::new(160);

    c.bench_function("resolve_price", |b| {
        b.iter(|| engine.resolve_price(PropertyId(1), black_box(date)).unwrap())
    });
}

fn bench_range_quote(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_quote");
    let engine = priced_engine();

    for nights in [3, 7, 30].iter() {
        group.throughput(Throughput::Elements(*nights as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nights), nights, |b, &nights| {
            let r = range(150, nights);
            b.iter(|| engine.range_quote(PropertyId(1), black_box(r)).unwrap())
        });
    }
    group.finish();
}

// =============================================================================
// Calendar Benchmarks
// =============================================================================

fn bench_build_month(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_month");

    let engine = priced_engine();
    for i in 0..10u64 {
        let r = range(30 + i * 3, 2);
        engine
            .create_reservation(PropertyId(1), UserId(i as u32), r.start, r.end)
            .unwrap();
    }

    group.bench_function("cold", |b| {
        b.iter(|| {
            // A write invalidates the cached grid before every build.
            engine
                .set_price_override(PropertyId(1), OWNER, range(300, 1), dec!(99))
                .unwrap();
            engine.build_month(PropertyId(1), 2025, 2).unwrap()
        })
    });

    group.bench_function("cached", |b| {
        engine.build_month(PropertyId(1), 2025, 2).unwrap();
        b.iter(|| engine.build_month(PropertyId(1), 2025, 2).unwrap())
    });

    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_requests_across_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_requests_across_properties");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let engine = Arc::new(bench_engine(100));
                (0..count).into_par_iter().for_each(|i| {
                    let property = PropertyId((i % 100) as u32 + 1);
                    let r = range((i / 100) as u64, 1);
                    engine
                        .create_reservation(property, UserId(i as u32), r.start, r.end)
                        .unwrap();
                });
                black_box(&engine);
            })
        });
    }
    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    let total_ops = 5_000u32;

    // Fewer properties = more threads competing for the same timeline lock.
    for num_properties in [1, 10, 100].iter() {
        group.throughput(Throughput::Elements(total_ops as u64));
        group.bench_with_input(
            BenchmarkId::new("properties", num_properties),
            num_properties,
            |b, &num_properties| {
                b.iter(|| {
                    let engine = Arc::new(bench_engine(num_properties));
                    (0..total_ops).into_par_iter().for_each(|i| {
                        let property = PropertyId(i % num_properties + 1);
                        // Most of these conflict; the lock, not the insert,
                        // is what this measures.
                        let r = range((i % 50) as u64, 1);
                        let _ = engine.create_reservation(
                            property,
                            UserId(i),
                            r.start,
                            r.end,
                        );
                    });
                    black_box(&engine);
                })
            },
        );
    }
    group.finish();
}

fn bench_parallel_grid_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_grid_reads");
    let total_reads = 10_000u32;

    let engine = Arc::new(priced_engine());
    for i in 0..20u64 {
        let r = range(i * 3, 2);
        engine
            .create_reservation(PropertyId(1), UserId(i as u32), r.start, r.end)
            .unwrap();
    }

    group.throughput(Throughput::Elements(total_reads as u64));
    group.bench_function("cached_grid", |b| {
        b.iter(|| {
            (0..total_reads).into_par_iter().for_each(|i| {
                let month = (i % 12) + 1;
                let _ = engine.build_month(PropertyId(1), 2025, month);
            });
        })
    });
    group.finish();
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(
    single_threaded,
    bench_single_request,
    bench_request_and_approve,
    bench_request_throughput,
    bench_conflict_check_with_history,
);

criterion_group!(pricing, bench_resolve_price, bench_range_quote,);

criterion_group!(calendar, bench_build_month,);

criterion_group!(
    multi_threaded,
    bench_parallel_requests_across_properties,
    bench_contention,
    bench_parallel_grid_reads,
);

criterion_main!(single_threaded, pricing, calendar, multi_threaded);
