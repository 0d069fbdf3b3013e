// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layout enumeration.
//!
//! Walks the profiles of a device model in catalog order and, for each,
//! chooses a count from zero up to whatever the remaining budget and the
//! per-profile limit allow. Every leaf of that tree is one admissible
//! layout:
//!
//! ```text
//!              1g.5gb=0 ─┬─ 2g.10gb=0 ─ ... ─► {}
//!                        └─ 2g.10gb=1 ─ ... ─► {2g.10gb: 1}
//!   (root) ─── 1g.5gb=1 ─── ...
//!              ...
//! ```
//!
//! The all-zero layout is included: it is the cleared device and is a
//! valid target for `set_layout`.
//!
//! The walk uses an explicit stack rather than recursion. Children are
//! pushed highest-count first so they pop in ascending order, which makes
//! the output order identical to a depth-first recursive walk.

use mig_types::{DeviceModel, Layout, ProfileSpec};

/// One pending node of the enumeration tree.
struct Frame {
    /// Index of the next profile to assign a count to.
    depth: usize,
    /// Counts chosen so far, one per already-visited profile.
    counts: Vec<usize>,
    remaining_compute: u32,
    remaining_memory: u32,
}

/// Returns every layout admissible on `model`, in deterministic order.
///
/// # Example
/// ```
/// use mig_planner::enumerate_layouts;
/// use mig_types::DeviceModel;
///
/// let layouts = enumerate_layouts(DeviceModel::A30_24gb);
/// assert!(layouts[0].is_empty());
/// assert!(layouts.iter().all(|l| DeviceModel::A30_24gb.check_layout(l).is_ok()));
/// ```
pub fn enumerate_layouts(model: DeviceModel) -> Vec<Layout> {
    let layouts = enumerate_specs(model.profiles(), model.compute_slices(), model.memory_slices());
    tracing::debug!(model = %model, count = layouts.len(), "enumerated layouts");
    layouts
}

/// Enumerates layouts over an arbitrary catalog and slice budget.
pub fn enumerate_specs(
    specs: &[ProfileSpec],
    compute_budget: u32,
    memory_budget: u32,
) -> Vec<Layout> {
    let mut layouts = Vec::new();
    let mut stack = vec![Frame {
        depth: 0,
        counts: Vec::with_capacity(specs.len()),
        remaining_compute: compute_budget,
        remaining_memory: memory_budget,
    }];

    while let Some(frame) = stack.pop() {
        let Some(spec) = specs.get(frame.depth) else {
            layouts.push(Layout::from_counts(
                specs.iter().map(|s| s.profile).zip(frame.counts),
            ));
            continue;
        };

        let max = max_count(spec, frame.remaining_compute, frame.remaining_memory);
        for count in (0..=max).rev() {
            let mut counts = frame.counts.clone();
            counts.push(count as usize);
            stack.push(Frame {
                depth: frame.depth + 1,
                counts,
                remaining_compute: frame.remaining_compute - spec.compute_slices * count,
                remaining_memory: frame.remaining_memory - spec.memory_slices * count,
            });
        }
    }

    layouts
}

/// Largest count of `spec` that fits the remaining budget and its limit.
fn max_count(spec: &ProfileSpec, remaining_compute: u32, remaining_memory: u32) -> u32 {
    let by_compute = remaining_compute.checked_div(spec.compute_slices).unwrap_or(u32::MAX);
    let by_memory = remaining_memory.checked_div(spec.memory_slices).unwrap_or(u32::MAX);
    spec.max_instances.min(by_compute).min(by_memory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mig_types::Profile;
    use std::collections::HashSet;

    #[test]
    fn test_a100_40gb_count() {
        assert_eq!(enumerate_layouts(DeviceModel::A100Sxm4_40gb).len(), 38);
    }

    #[test]
    fn test_a30_count() {
        assert_eq!(enumerate_layouts(DeviceModel::A30_24gb).len(), 10);
    }

    #[test]
    fn test_all_admissible_and_unique() {
        for model in DeviceModel::ALL {
            let layouts = enumerate_layouts(model);
            let unique: HashSet<&Layout> = layouts.iter().collect();
            assert_eq!(unique.len(), layouts.len(), "{model}: duplicate layouts");
            for layout in &layouts {
                model.check_layout(layout).unwrap();
            }
        }
    }

    #[test]
    fn test_includes_empty_first() {
        let layouts = enumerate_layouts(DeviceModel::A100Sxm4_40gb);
        assert_eq!(layouts[0], Layout::new());
        assert_eq!(layouts.iter().filter(|l| l.is_empty()).count(), 1);
    }

    #[test]
    fn test_deterministic_order() {
        let a = enumerate_layouts(DeviceModel::H100Sxm5_80gb);
        let b = enumerate_layouts(DeviceModel::H100Sxm5_80gb);
        assert_eq!(a, b);

        // Second emitted layout bumps the last profile first (depth-first, ascending).
        assert_eq!(a[1], Layout::from_counts([(Profile::new(7, 80), 1)]));
    }

    #[test]
    fn test_complete_against_brute_force() {
        // Every count vector within the per-profile limits that passes the
        // admissibility check must be produced.
        let model = DeviceModel::A100Sxm4_40gb;
        let specs = model.profiles();
        let produced: HashSet<Layout> = enumerate_layouts(model).into_iter().collect();

        let mut expected = 0;
        let mut counts = vec![0u32; specs.len()];
        loop {
            let layout = Layout::from_counts(
                specs.iter().zip(&counts).map(|(s, &c)| (s.profile, c as usize)),
            );
            if model.check_layout(&layout).is_ok() {
                expected += 1;
                assert!(produced.contains(&layout), "missing {layout}");
            }

            // Odometer increment.
            let mut i = 0;
            while i < specs.len() {
                counts[i] += 1;
                if counts[i] <= specs[i].max_instances {
                    break;
                }
                counts[i] = 0;
                i += 1;
            }
            if i == specs.len() {
                break;
            }
        }
        assert_eq!(expected, produced.len());
    }

    #[test]
    fn test_zero_budget_yields_only_empty() {
        let layouts = enumerate_specs(DeviceModel::A30_24gb.profiles(), 0, 0);
        assert_eq!(layouts, vec![Layout::new()]);
    }
}
