// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `mig-parted apply` command: apply a named config to a simulated node.
//!
//! Each targeted device is configured on its own blocking task; a failure
//! on one device does not stop the others.

use super::{apply_node, format_ordering, NodeSpec};

pub async fn execute(spec: NodeSpec) -> anyhow::Result<()> {
    super::banner("Apply Config");

    println!("  Config:  {}", spec.config.display());
    println!("  Select:  {}", spec.select);
    println!("  Node:    {} × {}", spec.gpus, spec.model);
    println!();

    let outcomes = apply_node(&spec).await?;

    // ── Per-Device Results ─────────────────────────────────────
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) if !report.mig_enabled => {
                println!("  {:<6} MIG disabled", report.device);
            }
            Ok(report) => {
                println!(
                    "  {:<6} {}  ({} attempt{})",
                    report.device,
                    report.layout,
                    report.attempts,
                    if report.attempts == 1 { "" } else { "s" },
                );
                if !report.ordering.is_empty() {
                    println!("         order: {}", format_ordering(&report.ordering));
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!(device = outcome.target.device_index, "{e}");
                println!("  gpu{:<3} FAILED: {e}", outcome.target.device_index);
            }
        }
    }
    println!();

    let untouched = spec.gpus - outcomes.len();
    println!(
        "  Applied: {}   Failed: {failed}   Untouched: {untouched}",
        outcomes.len() - failed,
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {} devices failed", outcomes.len());
    }
    Ok(())
}
