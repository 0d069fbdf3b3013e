// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition configuration loaded from TOML files.
//!
//! A file holds any number of named configs. Each named config is a list
//! of entries; an entry selects devices and gives them a MIG mode and a
//! layout.
//!
//! # TOML Format
//! ```toml
//! version = "v1"
//!
//! [[mig-configs.all-disabled]]
//! devices = "all"
//! mig-enabled = false
//!
//! [[mig-configs.all-1g]]
//! devices = "all"
//! mig-enabled = true
//! mig-devices = { "1g.5gb" = 7 }
//!
//! [[mig-configs.mixed]]
//! devices = [0, 1, 2, 3]
//! mig-enabled = true
//! mig-devices = { "3g.20gb" = 1, "2g.10gb" = 1, "1g.5gb" = 2 }
//!
//! [[mig-configs.mixed]]
//! devices = [4, 5, 6, 7]
//! mig-enabled = true
//! mig-devices = { "7g.40gb" = 1 }
//! ```

use crate::ConfigError;
use mig_types::{DeviceModel, Layout};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// The only schema version understood.
pub const CONFIG_VERSION: &str = "v1";

/// A whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartedConfig {
    /// Schema version, must be `"v1"`.
    pub version: String,
    /// Named configs, each a list of device entries.
    pub mig_configs: BTreeMap<String, Vec<DeviceConfig>>,
}

/// One entry of a named config.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeviceConfig {
    /// Which devices the entry applies to.
    pub devices: DeviceSelector,
    /// Desired MIG mode.
    #[serde(default = "default_true")]
    pub mig_enabled: bool,
    /// Desired layout as profile → count. Ignored when MIG is disabled.
    #[serde(default)]
    pub mig_devices: Layout,
}

fn default_true() -> bool {
    true
}

/// `"all"` or an explicit list of device indices.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DeviceSelector {
    Named(String),
    Indices(Vec<usize>),
}

impl DeviceSelector {
    /// Expands the selector against a node with `count` devices.
    fn resolve(&self, config: &str, count: usize) -> Result<Vec<usize>, ConfigError> {
        match self {
            DeviceSelector::Named(name) if name.eq_ignore_ascii_case("all") => {
                Ok((0..count).collect())
            }
            DeviceSelector::Named(name) => Err(ConfigError::InvalidSelector(name.clone())),
            DeviceSelector::Indices(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= count) {
                    return Err(ConfigError::DeviceOutOfRange {
                        config: config.to_string(),
                        index,
                        count,
                    });
                }
                Ok(indices.clone())
            }
        }
    }
}

/// Desired state of one device after resolving a named config.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeviceTarget {
    pub device_index: usize,
    pub mig_enabled: bool,
    pub layout: Layout,
}

impl PartedConfig {
    /// Loads a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    /// Serialises the configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Names of all configs in the file.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mig_configs.keys().map(String::as_str)
    }

    /// Checks every layout in every config against `model`.
    pub fn validate(&self, model: DeviceModel) -> Result<(), ConfigError> {
        for (name, entries) in &self.mig_configs {
            for entry in entries.iter().filter(|e| e.mig_enabled) {
                model
                    .check_layout(&entry.mig_devices)
                    .map_err(|source| ConfigError::InvalidLayout {
                        config: name.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Expands the named config into per-device targets, sorted by index.
    ///
    /// Devices the config does not mention get no target and are left alone.
    pub fn resolve(
        &self,
        name: &str,
        model: DeviceModel,
        device_count: usize,
    ) -> Result<Vec<DeviceTarget>, ConfigError> {
        let entries = self.mig_configs.get(name).ok_or_else(|| ConfigError::UnknownConfig {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })?;

        let mut seen = BTreeSet::new();
        let mut targets = Vec::new();

        for entry in entries {
            let layout = if entry.mig_enabled {
                model
                    .check_layout(&entry.mig_devices)
                    .map_err(|source| ConfigError::InvalidLayout {
                        config: name.to_string(),
                        source,
                    })?;
                entry.mig_devices.clone()
            } else {
                Layout::new()
            };

            for index in entry.devices.resolve(name, device_count)? {
                if !seen.insert(index) {
                    return Err(ConfigError::DuplicateDevice {
                        config: name.to_string(),
                        index,
                    });
                }
                targets.push(DeviceTarget {
                    device_index: index,
                    mig_enabled: entry.mig_enabled,
                    layout: layout.clone(),
                });
            }
        }

        targets.sort_by_key(|t| t.device_index);
        tracing::debug!(config = name, targets = targets.len(), "resolved config");
        Ok(targets)
    }
}
