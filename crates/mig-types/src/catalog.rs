// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Static profile catalogs for the supported device models.
//!
//! Each [`DeviceModel`] has a fixed number of compute slices and memory
//! slices, and a list of [`ProfileSpec`]s describing what one instance of
//! each profile consumes and where the hardware may place it.
//!
//! ```text
//! memory slice:   0   1   2   3   4   5   6   7
//! 7g.40gb         [=============================]
//! 4g.20gb         [=============]
//! 3g.20gb         [=============] [=============]
//! 2g.10gb         [=====] [=====] [=====]
//! 1g.5gb          [=] [=] [=] [=] [=] [=] [=]
//! ```

use crate::{Layout, Profile, TypeError};
use std::fmt;
use std::str::FromStr;

/// What one instance of a profile consumes on a given device model.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProfileSpec {
    /// The profile this entry describes.
    pub profile: Profile,
    /// Compute slices consumed per instance.
    pub compute_slices: u32,
    /// Memory slices consumed per instance.
    pub memory_slices: u32,
    /// Maximum number of simultaneous instances of this profile.
    pub max_instances: u32,
    /// Legal start offsets, in memory-slice units.
    pub placements: &'static [u32],
}

const fn spec(
    slices: u32,
    memory_gb: u32,
    memory_slices: u32,
    max_instances: u32,
    placements: &'static [u32],
) -> ProfileSpec {
    ProfileSpec {
        profile: Profile::new(slices, memory_gb),
        compute_slices: slices,
        memory_slices,
        max_instances,
        placements,
    }
}

const A100_40GB_PROFILES: &[ProfileSpec] = &[
    spec(1, 5, 1, 7, &[0, 1, 2, 3, 4, 5, 6]),
    spec(2, 10, 2, 3, &[0, 2, 4]),
    spec(3, 20, 4, 2, &[0, 4]),
    spec(4, 20, 4, 1, &[0]),
    spec(7, 40, 8, 1, &[0]),
];

const A100_80GB_PROFILES: &[ProfileSpec] = &[
    spec(1, 10, 1, 7, &[0, 1, 2, 3, 4, 5, 6]),
    spec(2, 20, 2, 3, &[0, 2, 4]),
    spec(3, 40, 4, 2, &[0, 4]),
    spec(4, 40, 4, 1, &[0]),
    spec(7, 80, 8, 1, &[0]),
];

const A30_24GB_PROFILES: &[ProfileSpec] = &[
    spec(1, 6, 1, 4, &[0, 1, 2, 3]),
    spec(2, 12, 2, 2, &[0, 2]),
    spec(4, 24, 4, 1, &[0]),
];

/// A GPU model with MIG support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceModel {
    A100Sxm4_40gb,
    A100Sxm4_80gb,
    H100Sxm5_80gb,
    A30_24gb,
}

/// Slice consumption of an admissible layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SliceUsage {
    pub compute_slices: u32,
    pub memory_slices: u32,
}

impl DeviceModel {
    /// Every model in the catalog.
    pub const ALL: [DeviceModel; 4] = [
        DeviceModel::A100Sxm4_40gb,
        DeviceModel::A100Sxm4_80gb,
        DeviceModel::H100Sxm5_80gb,
        DeviceModel::A30_24gb,
    ];

    /// Marketing name, also accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            DeviceModel::A100Sxm4_40gb => "A100-SXM4-40GB",
            DeviceModel::A100Sxm4_80gb => "A100-SXM4-80GB",
            DeviceModel::H100Sxm5_80gb => "H100-SXM5-80GB",
            DeviceModel::A30_24gb => "A30-24GB",
        }
    }

    /// Total compute slices.
    pub fn compute_slices(&self) -> u32 {
        match self {
            DeviceModel::A30_24gb => 4,
            _ => 7,
        }
    }

    /// Total memory slices.
    pub fn memory_slices(&self) -> u32 {
        match self {
            DeviceModel::A30_24gb => 4,
            _ => 8,
        }
    }

    /// Profiles offered by this model, smallest first.
    pub fn profiles(&self) -> &'static [ProfileSpec] {
        match self {
            DeviceModel::A100Sxm4_40gb => A100_40GB_PROFILES,
            DeviceModel::A100Sxm4_80gb | DeviceModel::H100Sxm5_80gb => A100_80GB_PROFILES,
            DeviceModel::A30_24gb => A30_24GB_PROFILES,
        }
    }

    /// Looks up the catalog entry for `profile`.
    pub fn spec(&self, profile: &Profile) -> Option<&'static ProfileSpec> {
        self.profiles().iter().find(|s| s.profile == *profile)
    }

    /// Checks that `layout` can be hosted by this model.
    ///
    /// A layout is admissible when every profile is in the catalog, no
    /// per-profile instance limit is exceeded, and the compute and memory
    /// slice totals both fit. Returns the slice usage on success.
    pub fn check_layout(&self, layout: &Layout) -> Result<SliceUsage, TypeError> {
        let mut usage = SliceUsage::default();

        for (profile, count) in layout.iter() {
            let spec = self.spec(profile).ok_or_else(|| TypeError::UnsupportedProfile {
                model: self.name().to_string(),
                profile: profile.to_string(),
            })?;

            if count > spec.max_instances as usize {
                return Err(TypeError::InstanceLimitExceeded {
                    model: self.name().to_string(),
                    profile: profile.to_string(),
                    requested: count,
                    limit: spec.max_instances,
                });
            }

            // Bounded by max_instances above, so the cast cannot truncate.
            let count = count as u32;
            usage.compute_slices += spec.compute_slices * count;
            usage.memory_slices += spec.memory_slices * count;
        }

        if usage.compute_slices > self.compute_slices() {
            return Err(TypeError::CapacityExceeded {
                model: self.name().to_string(),
                resource: "compute",
                required: usage.compute_slices,
                available: self.compute_slices(),
            });
        }
        if usage.memory_slices > self.memory_slices() {
            return Err(TypeError::CapacityExceeded {
                model: self.name().to_string(),
                resource: "memory",
                required: usage.memory_slices,
                available: self.memory_slices(),
            });
        }

        Ok(usage)
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceModel {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DeviceModel::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TypeError::UnknownModel(wanted.to_string()))
    }
}

impl TryFrom<String> for DeviceModel {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceModel> for String {
    fn from(m: DeviceModel) -> Self {
        m.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(pairs: &[(&str, usize)]) -> Layout {
        Layout::parse_records(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_catalog_geometry_is_consistent() {
        for model in DeviceModel::ALL {
            for spec in model.profiles() {
                assert!(!spec.placements.is_empty(), "{model}: {} has no placements", spec.profile);
                for &start in spec.placements {
                    assert!(
                        start + spec.memory_slices <= model.memory_slices(),
                        "{model}: {} placement {start} overruns the device",
                        spec.profile
                    );
                }
                assert!(spec.max_instances as usize <= spec.placements.len());
                assert_eq!(spec.compute_slices, spec.profile.slices());
            }
        }
    }

    #[test]
    fn test_profiles_sorted() {
        for model in DeviceModel::ALL {
            let profiles: Vec<Profile> = model.profiles().iter().map(|s| s.profile).collect();
            let mut sorted = profiles.clone();
            sorted.sort();
            assert_eq!(profiles, sorted);
        }
    }

    #[test]
    fn test_parse_model_name() {
        assert_eq!("a100-sxm4-40gb".parse::<DeviceModel>().unwrap(), DeviceModel::A100Sxm4_40gb);
        assert_eq!(" A30-24GB ".parse::<DeviceModel>().unwrap(), DeviceModel::A30_24gb);
        assert!(matches!("V100".parse::<DeviceModel>(), Err(TypeError::UnknownModel(_))));
    }

    #[test]
    fn test_check_layout_full_device() {
        let usage = DeviceModel::A100Sxm4_40gb
            .check_layout(&layout(&[("3g.20gb", 1), ("2g.10gb", 1), ("1g.5gb", 2)]))
            .unwrap();
        assert_eq!(usage, SliceUsage { compute_slices: 7, memory_slices: 8 });
    }

    #[test]
    fn test_check_layout_empty() {
        let usage = DeviceModel::A30_24gb.check_layout(&Layout::new()).unwrap();
        assert_eq!(usage, SliceUsage::default());
    }

    #[test]
    fn test_check_layout_memory_exceeded() {
        // 2 × 3g.20gb already uses all 8 memory slices.
        let err = DeviceModel::A100Sxm4_40gb
            .check_layout(&layout(&[("3g.20gb", 2), ("1g.5gb", 1)]))
            .unwrap_err();
        assert!(matches!(err, TypeError::CapacityExceeded { resource: "memory", .. }));
    }

    #[test]
    fn test_check_layout_compute_exceeded() {
        let err = DeviceModel::A100Sxm4_40gb
            .check_layout(&layout(&[("4g.20gb", 1), ("2g.10gb", 2)]))
            .unwrap_err();
        assert!(matches!(
            err,
            TypeError::CapacityExceeded { resource: "compute", required: 8, available: 7, .. }
        ));
    }

    #[test]
    fn test_check_layout_instance_limit() {
        let err = DeviceModel::A30_24gb
            .check_layout(&layout(&[("2g.12gb", 3)]))
            .unwrap_err();
        assert!(matches!(err, TypeError::InstanceLimitExceeded { limit: 2, .. }));
    }

    #[test]
    fn test_check_layout_unsupported_profile() {
        let err = DeviceModel::A30_24gb
            .check_layout(&layout(&[("1g.5gb", 1)]))
            .unwrap_err();
        assert!(matches!(err, TypeError::UnsupportedProfile { .. }));
    }
}
