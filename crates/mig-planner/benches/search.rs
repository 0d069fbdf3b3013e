// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for layout enumeration and the permutation search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mig_planner::{enumerate_layouts, search_orderings, AttemptError, DistinctPermutations};
use mig_types::{DeviceModel, Layout, Profile};

fn bench_enumerate(c: &mut Criterion) {
    c.bench_function("enumerate_a100_40gb", |b| {
        b.iter(|| enumerate_layouts(black_box(DeviceModel::A100Sxm4_40gb)))
    });
}

fn bench_distinct_permutations(c: &mut Criterion) {
    // 7! / (3!·2!·1!·1!) = 420 distinct orderings.
    let items = vec![1u8, 1, 1, 2, 2, 3, 4];
    c.bench_function("distinct_permutations_420", |b| {
        b.iter(|| DistinctPermutations::new(black_box(items.clone())).count())
    });
}

fn bench_exhaustive_search(c: &mut Criterion) {
    let layout = Layout::parse_records([("1g.5gb", 3), ("2g.10gb", 2)]).unwrap();
    c.bench_function("search_exhaustive_10", |b| {
        b.iter(|| {
            search_orderings(black_box(&layout), |_: &[Profile]| {
                Err::<(), _>(AttemptError::Retry("never"))
            })
            .unwrap_err()
        })
    });
}

criterion_group!(
    benches,
    bench_enumerate,
    bench_distinct_permutations,
    bench_exhaustive_search
);
criterion_main!(benches);
