// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `mig-parted catalog` command: list the profiles of a device model.

use mig_types::DeviceModel;

pub async fn execute(model: DeviceModel) -> anyhow::Result<()> {
    super::banner("Profile Catalog");

    println!("  Model:          {model}");
    println!("  Compute slices: {}", model.compute_slices());
    println!("  Memory slices:  {}", model.memory_slices());
    println!();

    // ── Profiles ───────────────────────────────────────────────
    println!(
        "  {:<10} {:>8} {:>8} {:>6}  {}",
        "Profile", "Compute", "Memory", "Max", "Placements",
    );
    println!("  {}", "-".repeat(56));

    for spec in model.profiles() {
        let starts = spec
            .placements
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "  {:<10} {:>8} {:>8} {:>6}  [{starts}]",
            spec.profile.to_string(),
            spec.compute_slices,
            spec.memory_slices,
            spec.max_instances,
        );
    }
    println!();

    Ok(())
}
