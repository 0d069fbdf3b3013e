// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for profiles, catalogs and layouts.

/// Errors raised while parsing profiles or checking a layout against a
/// device model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// A profile string is not of the form `<g>g.<mem>gb`.
    #[error("invalid MIG profile '{input}': {reason}")]
    InvalidProfile { input: String, reason: String },

    /// The device model name is not in the catalog.
    #[error("unknown device model '{0}'")]
    UnknownModel(String),

    /// The profile exists syntactically but the device model does not offer it.
    #[error("profile {profile} is not supported on {model}")]
    UnsupportedProfile { model: String, profile: String },

    /// The layout needs more slices of some kind than the device has.
    #[error("layout needs {required} {resource} slices but {model} only has {available}")]
    CapacityExceeded {
        model: String,
        resource: &'static str,
        required: u32,
        available: u32,
    },

    /// More instances of one profile were requested than the device allows.
    #[error("{requested} instances of {profile} requested but {model} allows at most {limit}")]
    InstanceLimitExceeded {
        model: String,
        profile: String,
        requested: usize,
        limit: u32,
    },
}
