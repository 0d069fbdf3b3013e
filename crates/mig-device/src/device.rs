// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`MigDevice`] trait: the device API the config manager drives.
//!
//! One value implementing the trait is one physical (or simulated) GPU.
//! Implementations own all device state; callers re-read it through
//! [`MigDevice::list_instances`] rather than tracking it themselves.

use crate::DeviceError;
use mig_types::{DeviceModel, Profile};
use std::fmt;

/// Opaque identifier of a live instance, unique per device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct InstanceId(pub u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an instance sits, in memory-slice units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub start: u32,
    pub size: u32,
}

impl Placement {
    /// One past the last memory slice covered.
    pub fn end(&self) -> u32 {
        self.start + self.size
    }

    /// Returns `true` if the two placements share any memory slice.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// A live instance as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub profile: Profile,
    pub placement: Placement,
}

/// Device API for one MIG-capable GPU.
///
/// Calls against the same device must not overlap. Distinct devices are
/// independent, which is why the trait requires [`Send`]: callers may move
/// each device onto its own worker.
pub trait MigDevice: Send {
    /// Human-readable identifier used in logs and errors (e.g. `"gpu0"`).
    fn identifier(&self) -> String;

    /// The device model, which fixes the profile catalog.
    fn model(&self) -> DeviceModel;

    /// Whether MIG mode is currently enabled.
    fn is_mig_enabled(&self) -> Result<bool, DeviceError>;

    /// Enables or disables MIG mode.
    fn set_mig_mode(&mut self, enabled: bool) -> Result<(), DeviceError>;

    /// Lists the live instances.
    fn list_instances(&self) -> Result<Vec<Instance>, DeviceError>;

    /// Creates one instance of `profile`. May fail depending on what
    /// already exists and in what order it was created.
    fn create_instance(&mut self, profile: &Profile) -> Result<InstanceId, DeviceError>;

    /// Destroys the instance `id`.
    fn destroy_instance(&mut self, id: InstanceId) -> Result<(), DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_overlap() {
        let a = Placement { start: 0, size: 4 };
        let b = Placement { start: 4, size: 4 };
        let c = Placement { start: 2, size: 2 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
        assert!(!b.overlaps(&c));
        assert_eq!(b.end(), 8);
    }

    #[test]
    fn test_instance_serde() {
        let inst = Instance {
            id: InstanceId(3),
            profile: Profile::new(2, 10),
            placement: Placement { start: 2, size: 2 },
        };
        let json = serde_json::to_string(&inst).unwrap();
        assert!(json.contains("\"2g.10gb\""));
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }
}
