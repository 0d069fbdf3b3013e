// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mig-manager
//!
//! Orchestrates MIG partitioning of a device through the [`MigDevice`]
//! collaborator:
//!
//! - [`ConfigManager::set_layout`]: clear the device, then search
//!   creation orderings until the target layout is fully created.
//! - [`ConfigManager::get_layout`] / [`ConfigManager::clear_layout`] /
//!   [`ConfigManager::assert_layout`]: read, wipe and check.
//! - [`PartedConfig`]: named per-device targets loaded from TOML.
//! - [`apply_targets`]: bring a set of devices to their targets.
//!
//! # Failure Model
//!
//! | Error | Device afterwards |
//! |---|---|
//! | [`ManagerError::Capacity`], [`ManagerError::MigDisabled`] | untouched |
//! | [`ManagerError::Exhausted`] | empty |
//! | [`ManagerError::Fatal`] | unknown |
//!
//! Create failures are retried with the next ordering. Failures of list,
//! destroy or rollback are never retried.
//!
//! [`MigDevice`]: mig_device::MigDevice

mod apply;
pub mod config;
mod error;
mod manager;

pub use apply::{apply_target, apply_targets};
pub use config::{DeviceConfig, DeviceSelector, DeviceTarget, PartedConfig};
pub use error::{ConfigError, ManagerError};
pub use manager::{ApplyReport, ConfigManager};
