// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mig-types
//!
//! The vocabulary shared by every crate in the workspace:
//!
//! - [`Profile`]: a partition template such as `1g.5gb`.
//! - [`DeviceModel`] / [`ProfileSpec`]: per-model catalogs: slice
//!   budgets, instance limits and legal placements.
//! - [`Layout`]: a multiset of profile → count, the object both callers
//!   and devices speak in terms of.
//!
//! All types are value objects: compared by content, cheap to clone.
//!
//! # Example
//! ```
//! use mig_types::{DeviceModel, Layout};
//!
//! let layout = Layout::parse_records([("3g.20gb", 1), ("1g.5gb", 4)]).unwrap();
//! let usage = DeviceModel::A100Sxm4_40gb.check_layout(&layout).unwrap();
//! assert_eq!(usage.compute_slices, 7);
//! ```

mod catalog;
mod error;
mod layout;
mod profile;

pub use catalog::{DeviceModel, ProfileSpec, SliceUsage};
pub use error::TypeError;
pub use layout::Layout;
pub use profile::Profile;
