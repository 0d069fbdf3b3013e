// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `mig-parted assert` command: apply a named config, then read every
//! targeted device back and compare it with its target.

use super::{apply_node, NodeSpec};
use mig_manager::ConfigManager;

pub async fn execute(spec: NodeSpec) -> anyhow::Result<()> {
    super::banner("Assert Config");

    let outcomes = apply_node(&spec).await?;
    let manager = ConfigManager::new();

    let mut mismatched = 0;
    for outcome in &outcomes {
        let index = outcome.target.device_index;
        if let Err(e) = &outcome.result {
            mismatched += 1;
            println!("  gpu{index:<3} NOT APPLIED: {e}");
            continue;
        }

        let mode = manager.mig_mode(&outcome.device)?;
        if mode != outcome.target.mig_enabled {
            mismatched += 1;
            println!(
                "  gpu{index:<3} MISMATCH: MIG mode is {}, expected {}",
                on_off(mode),
                on_off(outcome.target.mig_enabled),
            );
            continue;
        }

        match manager.assert_layout(&outcome.device, &outcome.target.layout) {
            Ok(()) => println!("  gpu{index:<3} OK  {}", outcome.target.layout),
            Err(e) => {
                mismatched += 1;
                println!("  gpu{index:<3} MISMATCH: {e}");
            }
        }
    }
    println!();

    if mismatched > 0 {
        anyhow::bail!(
            "{mismatched} of {} devices do not match config '{}'",
            outcomes.len(),
            spec.select
        );
    }
    println!("  All {} targeted devices match '{}'.", outcomes.len(), spec.select);
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
