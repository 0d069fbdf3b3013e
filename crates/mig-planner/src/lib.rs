// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # mig-planner
//!
//! The pure algorithms behind MIG partitioning. Nothing in this crate
//! touches a device, so everything here is trivially unit-testable.
//!
//! - [`enumerate_layouts`]: every layout a device model can legally hold.
//! - [`DistinctPermutations`] / [`distinct_permutation_count`]:
//!   duplicate-aware orderings of a flattened layout.
//! - [`search_orderings`]: tries orderings until an [`OrderingAttempt`]
//!   succeeds, or reports exhaustion.
//!
//! # Search Flow
//!
//! ```text
//! Layout ──flatten──► [1g, 1g, 2g]
//!                          │
//!                          ▼
//!              DistinctPermutations (3 = 3!/2!·1!)
//!                          │ for each ordering
//!                          ▼
//!                 attempt(ordering) ──Ok──► SearchOutcome
//!                   │Retry      │Fatal
//!                   ▼           ▼
//!               next one    SearchError::Aborted
//!                   │
//!                   ▼ (none left)
//!           SearchError::Exhausted
//! ```

mod enumerate;
mod error;
mod permute;
mod search;

pub use enumerate::{enumerate_layouts, enumerate_specs};
pub use error::SearchError;
pub use permute::{distinct_permutation_count, DistinctPermutations};
pub use search::{search_orderings, AttemptError, OrderingAttempt, SearchOutcome};
