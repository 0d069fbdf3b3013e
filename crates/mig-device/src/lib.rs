// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mig-device
//!
//! The device API collaborator of the config manager.
//!
//! - [`MigDevice`]: create, destroy and list instances, toggle MIG mode.
//!   A production backend would implement it on top of the vendor
//!   management library; this crate ships only the simulator.
//! - [`SimulatedDevice`]: an in-memory device with first-fit placement,
//!   injectable order-dependent create rules and fault plans.
//! - [`SimulatedNode`]: several simulated devices of one model.
//!
//! # Example
//! ```
//! use mig_device::{MigDevice, SimulatedNode};
//! use mig_types::Profile;
//!
//! let mut node = SimulatedNode::dgx_a100();
//! let gpu = node.device_mut(0).unwrap();
//! gpu.set_mig_mode(true).unwrap();
//! gpu.create_instance(&Profile::new(3, 20)).unwrap();
//! assert_eq!(gpu.list_instances().unwrap().len(), 1);
//! ```

mod device;
mod error;
mod simulated;

pub use device::{Instance, InstanceId, MigDevice, Placement};
pub use error::DeviceError;
pub use simulated::{
    refuse_after, CallCounts, CreateRule, FaultPlan, SimulatedDevice, SimulatedNode,
};
