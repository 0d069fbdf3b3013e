// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! In-memory simulated MIG device.
//!
//! [`SimulatedDevice`] behaves like the firmware as far as the config
//! manager can observe: each new instance goes to the *first* free legal
//! start offset of its profile, so creation order matters. Creating a
//! `1g.5gb` before a `4g.20gb` takes slice 0 and leaves nowhere for the
//! larger profile; the reverse order succeeds.
//!
//! On top of that, tests can inject:
//! - create rules, closures that see the live instances and may refuse a
//!   creation (order-dependent failures beyond placement);
//! - a [`FaultPlan`] that makes list, destroy or mode calls fail, to
//!   exercise fatal paths.
//!
//! Every device is an independent value. There is no process-wide state.

use crate::{DeviceError, Instance, InstanceId, MigDevice, Placement};
use mig_types::{DeviceModel, Profile};
use std::cell::Cell;
use std::fmt;

/// A closure consulted before each creation. `Err(reason)` refuses it.
pub type CreateRule = Box<dyn Fn(&[Instance], &Profile) -> Result<(), String> + Send>;

/// Calls that should fail, for fault injection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    /// Every `list_instances` call fails.
    pub fail_list: bool,
    /// `destroy_instance` fails once this many destroys have succeeded.
    pub fail_destroy_after: Option<usize>,
    /// Every `set_mig_mode` call fails.
    pub fail_mode_change: bool,
}

/// How many times each device call was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub create: usize,
    pub destroy: usize,
    pub set_mode: usize,
}

impl CallCounts {
    /// Calls that can change device state.
    pub fn mutating(&self) -> usize {
        self.create + self.destroy + self.set_mode
    }
}

/// A simulated MIG-capable GPU.
///
/// # Example
/// ```
/// use mig_device::{MigDevice, SimulatedDevice};
/// use mig_types::{DeviceModel, Profile};
///
/// let mut gpu = SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb).with_mig_enabled();
///
/// // First-fit placement: the small instance lands on slice 0 ...
/// gpu.create_instance(&Profile::new(1, 5)).unwrap();
/// // ... so the 4g profile, which may only start at slice 0, no longer fits.
/// assert!(gpu.create_instance(&Profile::new(4, 20)).is_err());
/// ```
pub struct SimulatedDevice {
    index: usize,
    model: DeviceModel,
    mig_enabled: bool,
    instances: Vec<Instance>,
    next_id: u32,
    destroyed: usize,
    create_rules: Vec<CreateRule>,
    faults: FaultPlan,
    calls: Cell<CallCounts>,
}

impl SimulatedDevice {
    /// Creates an empty device with MIG mode disabled.
    pub fn new(index: usize, model: DeviceModel) -> Self {
        Self {
            index,
            model,
            mig_enabled: false,
            instances: Vec::new(),
            next_id: 0,
            destroyed: 0,
            create_rules: Vec::new(),
            faults: FaultPlan::default(),
            calls: Cell::new(CallCounts::default()),
        }
    }

    /// Builder: start with MIG mode enabled.
    pub fn with_mig_enabled(mut self) -> Self {
        self.mig_enabled = true;
        self
    }

    /// Builder: add a create rule.
    pub fn with_create_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&[Instance], &Profile) -> Result<(), String> + Send + 'static,
    {
        self.create_rules.push(Box::new(rule));
        self
    }

    /// Builder: install a fault plan.
    pub fn with_faults(mut self, faults: FaultPlan) -> Self {
        self.faults = faults;
        self
    }

    /// Replaces the fault plan on a live device.
    pub fn set_faults(&mut self, faults: FaultPlan) {
        self.faults = faults;
    }

    /// Device index within its node.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Call counters so far.
    pub fn calls(&self) -> CallCounts {
        self.calls.get()
    }

    /// Resets the call counters.
    pub fn reset_calls(&self) {
        self.calls.set(CallCounts::default());
    }

    fn record(&self, f: impl FnOnce(&mut CallCounts)) {
        let mut counts = self.calls.get();
        f(&mut counts);
        self.calls.set(counts);
    }

    fn insufficient(&self, profile: &Profile, reason: impl Into<String>) -> DeviceError {
        DeviceError::InsufficientResources {
            device: self.identifier(),
            profile: profile.to_string(),
            reason: reason.into(),
        }
    }

    fn ensure_enabled(&self) -> Result<(), DeviceError> {
        if self.mig_enabled {
            Ok(())
        } else {
            Err(DeviceError::MigDisabled {
                device: self.identifier(),
            })
        }
    }
}

impl MigDevice for SimulatedDevice {
    fn identifier(&self) -> String {
        format!("gpu{}", self.index())
    }

    fn model(&self) -> DeviceModel {
        self.model
    }

    fn is_mig_enabled(&self) -> Result<bool, DeviceError> {
        Ok(self.mig_enabled)
    }

    fn set_mig_mode(&mut self, enabled: bool) -> Result<(), DeviceError> {
        self.record(|c| c.set_mode += 1);
        if self.faults.fail_mode_change {
            return Err(DeviceError::CallFailed {
                device: self.identifier(),
                operation: "set_mig_mode",
                detail: "injected fault".into(),
            });
        }
        if !enabled && !self.instances.is_empty() {
            return Err(DeviceError::Busy {
                device: self.identifier(),
                instances: self.instances.len(),
            });
        }
        self.mig_enabled = enabled;
        Ok(())
    }

    fn list_instances(&self) -> Result<Vec<Instance>, DeviceError> {
        self.record(|c| c.list += 1);
        if self.faults.fail_list {
            return Err(DeviceError::CallFailed {
                device: self.identifier(),
                operation: "list_instances",
                detail: "injected fault".into(),
            });
        }
        Ok(self.instances.clone())
    }

    fn create_instance(&mut self, profile: &Profile) -> Result<InstanceId, DeviceError> {
        self.record(|c| c.create += 1);
        self.ensure_enabled()?;

        let spec = self
            .model
            .spec(profile)
            .ok_or_else(|| DeviceError::UnsupportedProfile {
                device: self.identifier(),
                profile: profile.to_string(),
            })?;

        let same = self.instances.iter().filter(|i| i.profile == *profile).count();
        if same >= spec.max_instances as usize {
            return Err(self.insufficient(profile, format!("limit of {} reached", spec.max_instances)));
        }

        let compute_used: u32 = self.instances.iter().map(|i| i.profile.slices()).sum();
        if compute_used + spec.compute_slices > self.model.compute_slices() {
            return Err(self.insufficient(profile, "no free compute slices"));
        }

        for rule in &self.create_rules {
            rule(&self.instances, profile).map_err(|reason| DeviceError::Rejected {
                device: self.identifier(),
                profile: profile.to_string(),
                reason,
            })?;
        }

        let placement = spec
            .placements
            .iter()
            .map(|&start| Placement {
                start,
                size: spec.memory_slices,
            })
            .find(|candidate| !self.instances.iter().any(|i| i.placement.overlaps(candidate)))
            .ok_or_else(|| self.insufficient(profile, "no free placement"))?;

        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.push(Instance {
            id,
            profile: *profile,
            placement,
        });
        tracing::trace!(device = %self.identifier(), %profile, start = placement.start, "instance created");
        Ok(id)
    }

    fn destroy_instance(&mut self, id: InstanceId) -> Result<(), DeviceError> {
        self.record(|c| c.destroy += 1);
        self.ensure_enabled()?;

        if matches!(self.faults.fail_destroy_after, Some(n) if self.destroyed >= n) {
            return Err(DeviceError::CallFailed {
                device: self.identifier(),
                operation: "destroy_instance",
                detail: "injected fault".into(),
            });
        }

        let pos = self
            .instances
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| DeviceError::InstanceNotFound {
                device: self.identifier(),
                id,
            })?;
        self.instances.remove(pos);
        self.destroyed += 1;
        Ok(())
    }
}

impl fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("index", &self.index)
            .field("model", &self.model)
            .field("mig_enabled", &self.mig_enabled)
            .field("instances", &self.instances)
            .field("create_rules", &self.create_rules.len())
            .field("faults", &self.faults)
            .finish()
    }
}

/// Rule: refuse `profile` while any instance of `blocker` exists.
///
/// Models an ordering constraint where `profile` must be created first.
pub fn refuse_after(profile: Profile, blocker: Profile) -> CreateRule {
    Box::new(move |live: &[Instance], requested: &Profile| {
        if *requested == profile && live.iter().any(|i| i.profile == blocker) {
            Err(format!("{profile} must be created before {blocker}"))
        } else {
            Ok(())
        }
    })
}

/// A multi-GPU server of identical simulated devices.
#[derive(Debug)]
pub struct SimulatedNode {
    devices: Vec<SimulatedDevice>,
}

impl SimulatedNode {
    /// Creates `count` devices of `model`, MIG mode disabled.
    pub fn new(model: DeviceModel, count: usize) -> Self {
        Self {
            devices: (0..count).map(|i| SimulatedDevice::new(i, model)).collect(),
        }
    }

    /// An eight-GPU A100-SXM4-40GB server.
    pub fn dgx_a100() -> Self {
        Self::new(DeviceModel::A100Sxm4_40gb, 8)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn device(&self, index: usize) -> Option<&SimulatedDevice> {
        self.devices.get(index)
    }

    pub fn device_mut(&mut self, index: usize) -> Option<&mut SimulatedDevice> {
        self.devices.get_mut(index)
    }

    pub fn devices_mut(&mut self) -> &mut [SimulatedDevice] {
        &mut self.devices
    }

    /// Takes the devices out, e.g. to hand each to its own worker.
    pub fn into_devices(self) -> Vec<SimulatedDevice> {
        self.devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: Profile = Profile::new(1, 5);
    const P2: Profile = Profile::new(2, 10);
    const P3: Profile = Profile::new(3, 20);
    const P4: Profile = Profile::new(4, 20);
    const P7: Profile = Profile::new(7, 40);

    fn gpu() -> SimulatedDevice {
        SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb).with_mig_enabled()
    }

    #[test]
    fn test_disabled_rejects_create() {
        let mut d = SimulatedDevice::new(1, DeviceModel::A100Sxm4_40gb);
        let err = d.create_instance(&P1).unwrap_err();
        assert_eq!(err, DeviceError::MigDisabled { device: "gpu1".into() });
    }

    #[test]
    fn test_first_fit_placement() {
        let mut d = gpu();
        d.create_instance(&P2).unwrap();
        d.create_instance(&P1).unwrap();
        d.create_instance(&P2).unwrap();
        let starts: Vec<u32> = d.list_instances().unwrap().iter().map(|i| i.placement.start).collect();
        assert_eq!(starts, vec![0, 2, 4]);
    }

    #[test]
    fn test_order_dependence() {
        let mut small_first = gpu();
        small_first.create_instance(&P1).unwrap();
        assert!(matches!(
            small_first.create_instance(&P4),
            Err(DeviceError::InsufficientResources { .. })
        ));

        let mut big_first = gpu();
        big_first.create_instance(&P4).unwrap();
        big_first.create_instance(&P1).unwrap();
        assert_eq!(big_first.list_instances().unwrap().len(), 2);
    }

    #[test]
    fn test_instance_limit() {
        let mut d = gpu();
        d.create_instance(&P7).unwrap();
        let err = d.create_instance(&P7).unwrap_err();
        assert!(matches!(err, DeviceError::InsufficientResources { .. }));
    }

    #[test]
    fn test_compute_budget() {
        let mut d = gpu();
        d.create_instance(&P3).unwrap();
        d.create_instance(&P3).unwrap();
        // All eight memory slices are taken.
        assert!(matches!(
            d.create_instance(&P1),
            Err(DeviceError::InsufficientResources { .. })
        ));
        // Compute is checked before placement.
        let mut e = gpu();
        e.create_instance(&P4).unwrap();
        e.create_instance(&P2).unwrap();
        let err = e.create_instance(&P2).unwrap_err();
        assert!(err.to_string().contains("compute"));
    }

    #[test]
    fn test_unsupported_profile() {
        let mut d = gpu();
        let err = d.create_instance(&Profile::new(1, 6)).unwrap_err();
        assert!(matches!(err, DeviceError::UnsupportedProfile { .. }));
    }

    #[test]
    fn test_destroy_frees_placement() {
        let mut d = gpu();
        let id = d.create_instance(&P1).unwrap();
        d.destroy_instance(id).unwrap();
        d.create_instance(&P4).unwrap();
        assert!(matches!(
            d.destroy_instance(id),
            Err(DeviceError::InstanceNotFound { .. })
        ));
    }

    #[test]
    fn test_create_rule() {
        let mut d = SimulatedDevice::new(0, DeviceModel::A100Sxm4_40gb)
            .with_mig_enabled()
            .with_create_rule(refuse_after(P2, P1));
        d.create_instance(&P1).unwrap();
        assert!(matches!(d.create_instance(&P2), Err(DeviceError::Rejected { .. })));
    }

    #[test]
    fn test_fault_plan() {
        let mut d = gpu().with_faults(FaultPlan {
            fail_destroy_after: Some(1),
            ..Default::default()
        });
        let a = d.create_instance(&P1).unwrap();
        let b = d.create_instance(&P1).unwrap();
        d.destroy_instance(a).unwrap();
        assert!(matches!(d.destroy_instance(b), Err(DeviceError::CallFailed { .. })));

        d.set_faults(FaultPlan {
            fail_list: true,
            ..Default::default()
        });
        assert!(d.list_instances().is_err());
    }

    #[test]
    fn test_disable_requires_empty() {
        let mut d = gpu();
        let id = d.create_instance(&P1).unwrap();
        assert!(matches!(d.set_mig_mode(false), Err(DeviceError::Busy { instances: 1, .. })));
        d.destroy_instance(id).unwrap();
        d.set_mig_mode(false).unwrap();
        assert!(!d.is_mig_enabled().unwrap());
    }

    #[test]
    fn test_call_counts() {
        let mut d = gpu();
        d.create_instance(&P1).unwrap();
        d.list_instances().unwrap();
        let calls = d.calls();
        assert_eq!(calls.create, 1);
        assert_eq!(calls.list, 1);
        assert_eq!(calls.mutating(), 1);
        d.reset_calls();
        assert_eq!(d.calls(), CallCounts::default());
    }

    #[test]
    fn test_node() {
        let mut node = SimulatedNode::dgx_a100();
        assert_eq!(node.len(), 8);
        node.device_mut(3).unwrap().set_mig_mode(true).unwrap();
        assert!(node.device(3).unwrap().is_mig_enabled().unwrap());
        assert!(!node.device(0).unwrap().is_mig_enabled().unwrap());
        let devices = node.into_devices();
        assert!(devices.iter().enumerate().all(|(i, d)| d.index() == i));
        assert_eq!(devices[7].identifier(), "gpu7");
    }
}
