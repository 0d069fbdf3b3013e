// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types reported by device implementations.

use crate::InstanceId;

/// Errors a [`crate::MigDevice`] call can return.
///
/// Messages leave out the device; callers reporting the error name it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Instance calls are meaningless until MIG mode is enabled.
    #[error("MIG mode is disabled")]
    MigDisabled { device: String },

    /// The device model does not offer this profile.
    #[error("profile {profile} is not supported")]
    UnsupportedProfile { device: String, profile: String },

    /// No room for another instance of this profile given what already exists.
    #[error("insufficient resources for {profile}: {reason}")]
    InsufficientResources {
        device: String,
        profile: String,
        reason: String,
    },

    /// The device refused the creation for a device-specific reason.
    #[error("creation of {profile} rejected: {reason}")]
    Rejected {
        device: String,
        profile: String,
        reason: String,
    },

    /// The instance id does not exist on this device.
    #[error("no instance with id {id}")]
    InstanceNotFound { device: String, id: InstanceId },

    /// MIG mode cannot be disabled while instances exist.
    #[error("busy, {instances} instances still exist")]
    Busy { device: String, instances: usize },

    /// The driver call itself failed.
    #[error("driver call {operation} returned: {detail}")]
    CallFailed {
        device: String,
        operation: &'static str,
        detail: String,
    },
}
