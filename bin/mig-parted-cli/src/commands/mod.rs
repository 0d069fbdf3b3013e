// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the helpers they share.

pub mod apply;
pub mod assert;
pub mod catalog;
pub mod enumerate;

use anyhow::Context;
use mig_device::{SimulatedDevice, SimulatedNode};
use mig_manager::{apply_target, ApplyReport, ConfigManager, DeviceTarget, ManagerError, PartedConfig};
use mig_types::{DeviceModel, Profile};
use std::path::PathBuf;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the `-v` count.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// A named config applied to a simulated node.
pub struct NodeSpec {
    pub config: PathBuf,
    pub select: String,
    pub model: DeviceModel,
    pub gpus: usize,
}

/// What happened to one targeted device.
pub struct DeviceOutcome {
    pub target: DeviceTarget,
    pub device: SimulatedDevice,
    pub result: Result<ApplyReport, ManagerError>,
}

/// Loads the config, builds the node and applies every target, one
/// blocking task per device. Devices without a target are not touched.
pub async fn apply_node(spec: &NodeSpec) -> anyhow::Result<Vec<DeviceOutcome>> {
    let config = PartedConfig::from_file(&spec.config)
        .with_context(|| format!("failed to load '{}'", spec.config.display()))?;
    let targets = config
        .resolve(&spec.select, spec.model, spec.gpus)
        .with_context(|| format!("cannot resolve config '{}'", spec.select))?;

    let mut devices: Vec<Option<SimulatedDevice>> = SimulatedNode::new(spec.model, spec.gpus)
        .into_devices()
        .into_iter()
        .map(Some)
        .collect();
    let manager = ConfigManager::new();

    let mut handles = Vec::with_capacity(targets.len());
    for target in targets {
        let mut device = devices
            .get_mut(target.device_index)
            .and_then(Option::take)
            .with_context(|| format!("gpu{} has no free device handle", target.device_index))?;

        handles.push(tokio::task::spawn_blocking(move || {
            let result = apply_target(&manager, &mut device, &target);
            DeviceOutcome {
                target,
                device,
                result,
            }
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await.context("device task panicked")?);
    }
    Ok(outcomes)
}

pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", format!("mig-parted · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}

pub fn format_ordering(ordering: &[Profile]) -> String {
    ordering
        .iter()
        .map(Profile::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}
