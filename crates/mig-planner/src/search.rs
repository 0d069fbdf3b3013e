// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Iterate permutations until one succeeds.
//!
//! Instance creation on a MIG device is order-sensitive: the same layout
//! may fail in one creation order and succeed in another because of
//! placement constraints. [`search_orderings`] tries the distinct
//! orderings of a layout's flattened form one by one and stops at the
//! first that the caller's [`OrderingAttempt`] accepts.
//!
//! The search knows nothing about devices. Undoing the partial work of a
//! failed attempt is the attempt's job.

use crate::{distinct_permutation_count, DistinctPermutations, SearchError};
use mig_types::{Layout, Profile};
use std::fmt;

/// Why a single ordering attempt did not succeed.
#[derive(Debug)]
pub enum AttemptError<E> {
    /// This ordering failed; the next one may succeed.
    Retry(E),
    /// Stop searching immediately and surface `E`.
    Fatal(E),
}

/// One attempt at realizing an ordering.
///
/// Implemented for any `FnMut(&[Profile]) -> Result<(), AttemptError<E>>`,
/// so closures can be passed directly.
pub trait OrderingAttempt {
    type Error: fmt::Display;

    fn attempt(&mut self, ordering: &[Profile]) -> Result<(), AttemptError<Self::Error>>;
}

impl<F, E> OrderingAttempt for F
where
    F: FnMut(&[Profile]) -> Result<(), AttemptError<E>>,
    E: fmt::Display,
{
    type Error = E;

    fn attempt(&mut self, ordering: &[Profile]) -> Result<(), AttemptError<E>> {
        self(ordering)
    }
}

/// A successful search.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SearchOutcome {
    /// Orderings tried, including the successful one. Zero for an empty layout.
    pub attempts: u64,
    /// The ordering that succeeded.
    pub ordering: Vec<Profile>,
}

/// Tries the distinct orderings of `layout` until `attempt` succeeds.
///
/// - An empty layout succeeds with zero attempts.
/// - If the k-th ordering is the first to succeed, exactly k attempts are made.
/// - If every ordering fails with [`AttemptError::Retry`], the result is
///   [`SearchError::Exhausted`] after exactly `n! / ∏cᵢ!` attempts.
/// - [`AttemptError::Fatal`] ends the search at once with
///   [`SearchError::Aborted`].
///
/// # Example
/// ```
/// use mig_planner::{search_orderings, AttemptError};
/// use mig_types::Layout;
///
/// let layout = Layout::parse_records([("1g.5gb", 2), ("2g.10gb", 1)]).unwrap();
/// let mut seen = 0;
/// let outcome = search_orderings(&layout, |_: &[mig_types::Profile]| {
///     seen += 1;
///     if seen == 2 { Ok(()) } else { Err(AttemptError::Retry("placement failed")) }
/// })
/// .unwrap();
/// assert_eq!(outcome.attempts, 2);
/// ```
pub fn search_orderings<A>(
    layout: &Layout,
    mut attempt: A,
) -> Result<SearchOutcome, SearchError<A::Error>>
where
    A: OrderingAttempt,
{
    let flattened = layout.flatten();
    if flattened.is_empty() {
        return Ok(SearchOutcome {
            attempts: 0,
            ordering: Vec::new(),
        });
    }

    let distinct = distinct_permutation_count(&layout.multiplicities());
    let mut attempts = 0;
    let mut last_error = None;

    for ordering in DistinctPermutations::new(flattened) {
        attempts += 1;
        match attempt.attempt(&ordering) {
            Ok(()) => {
                tracing::debug!(attempts, distinct, "ordering succeeded");
                return Ok(SearchOutcome { attempts, ordering });
            }
            Err(AttemptError::Retry(e)) => {
                tracing::debug!(attempt = attempts, distinct, error = %e, "ordering failed");
                last_error = Some(e);
            }
            Err(AttemptError::Fatal(e)) => {
                return Err(SearchError::Aborted {
                    layout: layout.clone(),
                    attempts,
                    error: e,
                });
            }
        }
    }

    tracing::warn!(%layout, attempts, "all distinct orderings failed");
    Err(SearchError::Exhausted {
        layout: layout.clone(),
        attempts,
        distinct,
        last_error,
    })
}
