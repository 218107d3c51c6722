// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for registry merging and navigation queries.
//!
//! Measures the performance of:
//! - Merging a full catalog delivered as out-of-order pages
//! - Re-registering identical content (the idempotent path)
//! - Snapshot navigation flags on a large registry

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gallery_lens::domain::gallery::Item;
use gallery_lens::gallery::{GalleryStore, Registry};
use std::hint::black_box;

const PAGE_SIZE: usize = 24;

fn pages(count: usize) -> Vec<(usize, Vec<Item>)> {
    (0..count)
        .map(|page| {
            let offset = page * PAGE_SIZE;
            let items = (offset..offset + PAGE_SIZE)
                .map(|i| Item::new(format!("photo-{i}"), format!("Photo {i}"), "bench", "u"))
                .collect();
            (offset, items)
        })
        .collect()
}

/// Merging pages that arrive last-first.
fn bench_out_of_order_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_merge");

    for count in [4, 40, 400] {
        let batches = pages(count);
        group.bench_with_input(
            BenchmarkId::new("reverse_order", count),
            &batches,
            |b, batches| {
                b.iter(|| {
                    let mut registry = Registry::new();
                    for (offset, items) in batches.iter().rev() {
                        registry.register(items, *offset);
                    }
                    black_box(registry.len());
                });
            },
        );
    }

    group.finish();
}

/// Re-registering content that is already present.
fn bench_idempotent_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_merge");

    let batches = pages(40);
    let mut registry = Registry::new();
    for (offset, items) in &batches {
        registry.register(items, *offset);
    }

    group.bench_function("idempotent_register", |b| {
        b.iter(|| {
            for (offset, items) in &batches {
                black_box(registry.register(items, *offset));
            }
        });
    });

    group.finish();
}

/// Navigation flags through the store snapshot.
fn bench_snapshot_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_merge");

    let store = GalleryStore::new();
    let commands = store.commands();
    for (offset, items) in pages(400) {
        commands.register(&items, offset);
    }
    commands.open_at_index(5_000);

    group.bench_function("snapshot_navigation", |b| {
        b.iter(|| {
            let snapshot = store.snapshot();
            black_box(snapshot.navigation());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_out_of_order_merge,
    bench_idempotent_register,
    bench_snapshot_navigation
);
criterion_main!(benches);
