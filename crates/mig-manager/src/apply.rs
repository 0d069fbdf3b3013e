// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Applying resolved config targets to a set of devices.

use crate::{ApplyReport, ConfigManager, DeviceTarget, ManagerError};
use mig_device::MigDevice;
use mig_types::Layout;

/// Brings one device to `target`: MIG mode first, then the layout.
pub fn apply_target<D: MigDevice + ?Sized>(
    manager: &ConfigManager,
    device: &mut D,
    target: &DeviceTarget,
) -> Result<ApplyReport, ManagerError> {
    manager.set_mig_mode(device, target.mig_enabled)?;

    if !target.mig_enabled {
        return Ok(ApplyReport {
            device: device.identifier(),
            mig_enabled: false,
            layout: Layout::new(),
            attempts: 0,
            ordering: Vec::new(),
        });
    }

    manager.set_layout(device, &target.layout)
}

/// Applies every target in order, stopping at the first error.
///
/// Devices without a target are not touched.
pub fn apply_targets<D: MigDevice>(
    manager: &ConfigManager,
    devices: &mut [D],
    targets: &[DeviceTarget],
) -> Result<Vec<ApplyReport>, ManagerError> {
    let count = devices.len();
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
        let device = devices
            .get_mut(target.device_index)
            .ok_or(ManagerError::NoSuchDevice {
                index: target.device_index,
                count,
            })?;
        reports.push(apply_target(manager, device, target)?);
    }

    Ok(reports)
}
