// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for applying layouts to a simulated device.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mig_device::SimulatedDevice;
use mig_manager::ConfigManager;
use mig_planner::enumerate_layouts;
use mig_types::{DeviceModel, Layout};

fn bench_set_layout_first_try(c: &mut Criterion) {
    let manager = ConfigManager::new();
    let layout = Layout::parse_records([("1g.5gb", 7)]).unwrap();
    let mut gpu = SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb).with_mig_enabled();

    c.bench_function("set_layout_1g_x7", |b| {
        b.iter(|| manager.set_layout(&mut gpu, black_box(&layout)).unwrap())
    });
}

fn bench_set_layout_with_reordering(c: &mut Criterion) {
    // Sorted order puts the 1g.5gb instances first, which blocks the 4g.20gb.
    let manager = ConfigManager::new();
    let layout = Layout::parse_records([("1g.5gb", 3), ("4g.20gb", 1)]).unwrap();
    let mut gpu = SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb).with_mig_enabled();

    c.bench_function("set_layout_reorder_4g", |b| {
        b.iter(|| manager.set_layout(&mut gpu, black_box(&layout)).unwrap())
    });
}

fn bench_cycle_all_layouts(c: &mut Criterion) {
    let manager = ConfigManager::new();
    let layouts = enumerate_layouts(DeviceModel::A100Sxm4_40gb);
    let mut gpu = SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb).with_mig_enabled();

    c.bench_function("set_layout_cycle_a100_40gb", |b| {
        b.iter(|| {
            for layout in &layouts {
                manager.set_layout(&mut gpu, layout).unwrap();
            }
        })
    });
}

criterion_group!(
    benches,
    bench_set_layout_first_try,
    bench_set_layout_with_reordering,
    bench_cycle_all_layouts
);
criterion_main!(benches);
