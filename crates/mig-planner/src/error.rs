// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the permutation search.

use mig_types::Layout;
use std::fmt;

/// Errors that end a permutation search without success.
///
/// `E` is the error type of the caller's ordering attempt.
#[derive(Debug, thiserror::Error)]
pub enum SearchError<E: fmt::Display> {
    /// Every distinct ordering was tried and none succeeded.
    #[error(
        "no viable ordering for layout {layout}: all {attempts} of {distinct} distinct orderings failed{}; \
         the device topology cannot currently host this layout",
        describe_last(.last_error)
    )]
    Exhausted {
        layout: Layout,
        attempts: u64,
        distinct: u64,
        last_error: Option<E>,
    },

    /// An attempt reported a failure that must not be retried.
    #[error("search over layout {layout} aborted on attempt {attempts}: {error}")]
    Aborted { layout: Layout, attempts: u64, error: E },
}

impl<E: fmt::Display> SearchError<E> {
    /// Number of orderings tried before the search ended.
    pub fn attempts(&self) -> u64 {
        match self {
            SearchError::Exhausted { attempts, .. } | SearchError::Aborted { attempts, .. } => {
                *attempts
            }
        }
    }
}

fn describe_last<E: fmt::Display>(last: &Option<E>) -> String {
    match last {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}
