// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The config manager: set, get, clear and assert layouts on one device.
//!
//! # Set Flow
//!
//! ```text
//! set_layout(device, layout)
//!   │ check_layout      ──✗──► Capacity   (no device call made)
//!   │ is_mig_enabled    ──✗──► MigDisabled
//!   │ clear_layout      ──✗──► Fatal
//!   ▼
//! search_orderings ── for each distinct ordering:
//!   create, create, ... ──all ok──► ApplyReport
//!          │ create failed
//!          ▼
//!   destroy what this attempt created ──✗──► Fatal (search aborted)
//!          │
//!          ▼ next ordering ... none left ──► Exhausted (device empty)
//! ```
//!
//! The manager holds no device state. Every read goes to the device.

use crate::ManagerError;
use mig_device::{DeviceError, InstanceId, MigDevice};
use mig_planner::{search_orderings, AttemptError, SearchError};
use mig_types::{Layout, Profile};

/// Result of a successful [`ConfigManager::set_layout`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApplyReport {
    /// Device identifier.
    pub device: String,
    /// Whether MIG mode is enabled after the operation.
    pub mig_enabled: bool,
    /// The layout now on the device.
    pub layout: Layout,
    /// Creation orderings tried, including the one that worked.
    pub attempts: u64,
    /// The creation order that worked.
    pub ordering: Vec<Profile>,
}

/// Applies and inspects MIG layouts through a [`MigDevice`].
///
/// Stateless and `Copy`: one manager can serve any number of devices,
/// from any number of threads. Calls against the *same* device must be
/// serialized by the caller.
///
/// # Example
/// ```
/// use mig_device::SimulatedDevice;
/// use mig_manager::ConfigManager;
/// use mig_types::{DeviceModel, Layout};
///
/// let mut gpu = SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb).with_mig_enabled();
/// let manager = ConfigManager::new();
///
/// let target = Layout::parse_records([("4g.20gb", 1), ("1g.5gb", 3)]).unwrap();
/// let report = manager.set_layout(&mut gpu, &target).unwrap();
/// assert_eq!(manager.get_layout(&gpu).unwrap(), target);
/// println!("applied after {} orderings", report.attempts);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigManager;

impl ConfigManager {
    pub fn new() -> Self {
        Self
    }

    /// Reads the live layout by counting the device's instances per profile.
    pub fn get_layout<D: MigDevice + ?Sized>(&self, device: &D) -> Result<Layout, ManagerError> {
        let instances = device
            .list_instances()
            .map_err(|e| fatal(device, "list_instances", None, 0, e))?;
        Ok(instances.into_iter().map(|i| i.profile).collect())
    }

    /// Destroys every live instance. Succeeds without effect on an empty
    /// device or one with MIG mode disabled.
    pub fn clear_layout<D: MigDevice + ?Sized>(&self, device: &mut D) -> Result<(), ManagerError> {
        if !self.mig_mode(device)? {
            return Ok(());
        }

        let instances = device
            .list_instances()
            .map_err(|e| fatal(device, "list_instances", None, 0, e))?;
        if instances.is_empty() {
            return Ok(());
        }

        tracing::info!(device = %device.identifier(), count = instances.len(), "clearing instances");
        for instance in instances {
            device
                .destroy_instance(instance.id)
                .map_err(|e| fatal(device, "destroy_instance", None, 0, e))?;
        }
        Ok(())
    }

    /// Replaces whatever is on the device with `layout`.
    ///
    /// Either the device ends up holding exactly `layout`, or an error is
    /// returned. On [`ManagerError::Exhausted`] the device is left empty;
    /// only [`ManagerError::Fatal`] leaves it in an unknown state.
    pub fn set_layout<D: MigDevice + ?Sized>(
        &self,
        device: &mut D,
        layout: &Layout,
    ) -> Result<ApplyReport, ManagerError> {
        let id = device.identifier();

        device
            .model()
            .check_layout(layout)
            .map_err(|source| ManagerError::Capacity {
                device: id.clone(),
                layout: layout.clone(),
                source,
            })?;

        if !self.mig_mode(device).map_err(|e| with_target(e, layout))? {
            return Err(ManagerError::MigDisabled { device: id });
        }

        tracing::info!(device = %id, %layout, "applying layout");
        self.clear_layout(device).map_err(|e| with_target(e, layout))?;

        let result = search_orderings(layout, |ordering: &[Profile]| {
            create_in_order(device, ordering)
        });

        if let Err(e) = &result {
            tracing::warn!(device = %id, %layout, attempts = e.attempts(), "layout search failed");
        }

        match result {
            Ok(outcome) => {
                tracing::info!(device = %id, %layout, attempts = outcome.attempts, "layout applied");
                Ok(ApplyReport {
                    device: id,
                    mig_enabled: true,
                    layout: layout.clone(),
                    attempts: outcome.attempts,
                    ordering: outcome.ordering,
                })
            }
            Err(SearchError::Exhausted {
                layout,
                attempts,
                distinct,
                last_error,
            }) => Err(ManagerError::Exhausted {
                device: id,
                layout,
                attempts,
                distinct,
                last_error,
            }),
            Err(SearchError::Aborted {
                layout,
                attempts,
                error,
            }) => Err(ManagerError::Fatal {
                device: id,
                operation: "rollback",
                target: Some(layout),
                attempts,
                source: error,
            }),
        }
    }

    /// Checks that the device holds exactly `expected`.
    pub fn assert_layout<D: MigDevice + ?Sized>(
        &self,
        device: &D,
        expected: &Layout,
    ) -> Result<(), ManagerError> {
        let actual = self.get_layout(device)?;
        if actual == *expected {
            Ok(())
        } else {
            Err(ManagerError::Mismatch {
                device: device.identifier(),
                expected: expected.clone(),
                actual,
            })
        }
    }

    /// Whether MIG mode is enabled on the device.
    pub fn mig_mode<D: MigDevice + ?Sized>(&self, device: &D) -> Result<bool, ManagerError> {
        device
            .is_mig_enabled()
            .map_err(|e| fatal(device, "query_mig_mode", None, 0, e))
    }

    /// Enables or disables MIG mode. Disabling clears the device first.
    /// A no-op when the device is already in the requested mode.
    pub fn set_mig_mode<D: MigDevice + ?Sized>(
        &self,
        device: &mut D,
        enabled: bool,
    ) -> Result<(), ManagerError> {
        if self.mig_mode(device)? == enabled {
            return Ok(());
        }
        if !enabled {
            self.clear_layout(device)?;
        }
        tracing::info!(device = %device.identifier(), enabled, "changing MIG mode");
        device
            .set_mig_mode(enabled)
            .map_err(|e| fatal(device, "set_mig_mode", None, 0, e))
    }
}

/// One ordering attempt: create instances in `ordering`, rolling back
/// everything this attempt created if any creation fails.
fn create_in_order<D: MigDevice + ?Sized>(
    device: &mut D,
    ordering: &[Profile],
) -> Result<(), AttemptError<DeviceError>> {
    let mut created: Vec<InstanceId> = Vec::with_capacity(ordering.len());

    for profile in ordering {
        match device.create_instance(profile) {
            Ok(id) => created.push(id),
            Err(e) => {
                tracing::warn!(
                    device = %device.identifier(),
                    %profile,
                    rollback = created.len(),
                    error = %e,
                    "create failed, rolling back attempt"
                );
                for id in created.into_iter().rev() {
                    device.destroy_instance(id).map_err(AttemptError::Fatal)?;
                }
                return Err(AttemptError::Retry(e));
            }
        }
    }

    Ok(())
}

/// Names the layout being applied in a fatal error raised before the
/// ordering search started.
fn with_target(err: ManagerError, layout: &Layout) -> ManagerError {
    match err {
        ManagerError::Fatal {
            device,
            operation,
            target: None,
            attempts,
            source,
        } => ManagerError::Fatal {
            device,
            operation,
            target: Some(layout.clone()),
            attempts,
            source,
        },
        other => other,
    }
}

fn fatal<D: MigDevice + ?Sized>(
    device: &D,
    operation: &'static str,
    target: Option<Layout>,
    attempts: u64,
    source: DeviceError,
) -> ManagerError {
    ManagerError::Fatal {
        device: device.identifier(),
        operation,
        target,
        attempts,
        source,
    }
}
