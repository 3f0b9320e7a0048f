//! Benchmarks for inbox filtering
//!
//! Measures filter cost over inbox sizes the console is expected to hold.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use autoops_core::{filter_events, Event, EventType, FilterKey};

fn create_inbox(size: usize) -> Vec<Event> {
    (0..size)
        .map(|i| {
            let event_type = EventType::ALL[i % EventType::ALL.len()];
            Event::new(format!("evt_{}", i), event_type, "Benchmark event", "Bench Employee")
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_events");

    for size in [100usize, 1_000, 10_000] {
        let inbox = create_inbox(size);

        group.bench_with_input(BenchmarkId::new("all", size), &inbox, |b, inbox| {
            b.iter(|| filter_events(black_box(inbox), FilterKey::All).len())
        });

        group.bench_with_input(BenchmarkId::new("shift_coverage", size), &inbox, |b, inbox| {
            b.iter(|| {
                filter_events(black_box(inbox), FilterKey::Type(EventType::ShiftCoverage)).len()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
