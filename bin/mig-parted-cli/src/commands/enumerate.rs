// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `mig-parted enumerate` command: print every admissible layout.

use mig_types::DeviceModel;

pub async fn execute(model: DeviceModel, json: bool) -> anyhow::Result<()> {
    let layouts = mig_planner::enumerate_layouts(model);

    if json {
        println!("{}", serde_json::to_string_pretty(&layouts)?);
        return Ok(());
    }

    super::banner("Layout Enumerator");
    println!("  Model:   {model}");
    println!("  Layouts: {}", layouts.len());
    println!();

    println!("  {:<4} {:>8} {:>8} {:>6}  {}", "Idx", "Compute", "Memory", "Inst.", "Layout");
    println!("  {}", "-".repeat(64));

    for (i, layout) in layouts.iter().enumerate() {
        let usage = model.check_layout(layout)?;
        println!(
            "  {:<4} {:>5}/{:<2} {:>5}/{:<2} {:>6}  {layout}",
            i,
            usage.compute_slices,
            model.compute_slices(),
            usage.memory_slices,
            model.memory_slices(),
            layout.total_instances(),
        );
    }
    println!();

    Ok(())
}
