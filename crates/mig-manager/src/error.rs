// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the config manager and its configuration files.

use mig_device::DeviceError;
use mig_types::{Layout, TypeError};
use std::path::PathBuf;

/// Errors returned by [`crate::ConfigManager`] operations.
///
/// Every variant names the device it concerns. Only [`ManagerError::Fatal`]
/// means the device may be left in a state other than the target layout
/// or empty.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The layout cannot fit the device model. No device call was made.
    #[error("{device}: layout {layout} is not admissible: {source}")]
    Capacity {
        device: String,
        layout: Layout,
        #[source]
        source: TypeError,
    },

    /// Instances can only be managed with MIG mode enabled.
    #[error("{device}: MIG mode is disabled; enable it before applying a layout")]
    MigDisabled { device: String },

    /// No creation order worked. The device was left empty.
    #[error(
        "{device}: no viable ordering for layout {layout} after {attempts} of {distinct} \
         distinct orderings{}; the device topology cannot currently host it",
        describe_last(.last_error)
    )]
    Exhausted {
        device: String,
        layout: Layout,
        attempts: u64,
        distinct: u64,
        last_error: Option<DeviceError>,
    },

    /// A device call that is not retried failed. The device may be inconsistent.
    #[error(
        "{device}: {operation} failed{}: {source}; device state may be inconsistent",
        describe_target(.target, .attempts)
    )]
    Fatal {
        device: String,
        operation: &'static str,
        target: Option<Layout>,
        attempts: u64,
        #[source]
        source: DeviceError,
    },

    /// The live layout differs from the expected one.
    #[error("{device}: expected layout {expected}, found {actual}")]
    Mismatch {
        device: String,
        expected: Layout,
        actual: Layout,
    },

    /// A target names a device index that does not exist.
    #[error("no device with index {index} ({count} devices present)")]
    NoSuchDevice { index: usize, count: usize },

    /// The configuration file is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ManagerError {
    /// Returns `true` if the device may be left in an unknown state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ManagerError::Fatal { .. })
    }
}

fn describe_last(last: &Option<DeviceError>) -> String {
    match last {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}

fn describe_target(target: &Option<Layout>, attempts: &u64) -> String {
    match target {
        Some(layout) if *attempts == 0 => format!(" while applying {layout}"),
        Some(layout) => format!(" while applying {layout} (ordering attempt {attempts})"),
        None => String::new(),
    }
}

/// Errors loading or resolving a partition configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialisation error.
    #[error("TOML serialise error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Only `version = "v1"` is understood.
    #[error("unsupported config version '{0}'; expected 'v1'")]
    UnsupportedVersion(String),

    /// The selected named config does not exist.
    #[error("unknown config '{name}'; available: {available}")]
    UnknownConfig { name: String, available: String },

    /// A `devices` string other than `"all"`.
    #[error("invalid device selector '{0}'; expected \"all\" or a list of indices")]
    InvalidSelector(String),

    /// A device index beyond the node's device count.
    #[error("config '{config}' selects device {index}, but only {count} devices exist")]
    DeviceOutOfRange {
        config: String,
        index: usize,
        count: usize,
    },

    /// Two entries of the same config cover one device.
    #[error("config '{config}' selects device {index} more than once")]
    DuplicateDevice { config: String, index: usize },

    /// A layout in the config cannot fit the device model.
    #[error("config '{config}' has an invalid layout: {source}")]
    InvalidLayout {
        config: String,
        #[source]
        source: TypeError,
    },
}
