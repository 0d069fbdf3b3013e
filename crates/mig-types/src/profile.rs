// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! MIG profile identifiers.
//!
//! A [`Profile`] names one partition template: how many GPU slices an
//! instance occupies and how much memory it carries. The canonical text
//! form is `<g>g.<mem>gb`, e.g. `1g.5gb` or `3g.20gb`.

use crate::TypeError;
use std::fmt;
use std::str::FromStr;

/// A partition template, compared and ordered by content.
///
/// Ordering is by slice count first and memory second, which gives a
/// stable flattening order for [`crate::Layout`].
///
/// # Examples
/// ```
/// use mig_types::Profile;
///
/// let p: Profile = "3g.20gb".parse().unwrap();
/// assert_eq!(p.slices(), 3);
/// assert_eq!(p.memory_gb(), 20);
/// assert_eq!(p.to_string(), "3g.20gb");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Profile {
    slices: u32,
    memory_gb: u32,
}

impl Profile {
    /// Creates a profile from its slice count and memory size.
    pub const fn new(slices: u32, memory_gb: u32) -> Self {
        Self { slices, memory_gb }
    }

    /// Number of GPU slices one instance of this profile occupies.
    pub fn slices(&self) -> u32 {
        self.slices
    }

    /// Memory attached to one instance, in GB.
    pub fn memory_gb(&self) -> u32 {
        self.memory_gb
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g.{}gb", self.slices, self.memory_gb)
    }
}

impl FromStr for Profile {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidProfile {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let lower = s.trim().to_lowercase();
        let (slice_part, mem_part) = lower
            .split_once('.')
            .ok_or_else(|| invalid("expected '<g>g.<mem>gb'"))?;

        let slices: u32 = slice_part
            .strip_suffix('g')
            .ok_or_else(|| invalid("slice count must end in 'g'"))?
            .parse()
            .map_err(|_| invalid("slice count is not a number"))?;

        let memory_gb: u32 = mem_part
            .strip_suffix("gb")
            .ok_or_else(|| invalid("memory size must end in 'gb'"))?
            .parse()
            .map_err(|_| invalid("memory size is not a number"))?;

        if slices == 0 || memory_gb == 0 {
            return Err(invalid("slice count and memory size must be non-zero"));
        }

        Ok(Self { slices, memory_gb })
    }
}

impl TryFrom<String> for Profile {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Profile> for String {
    fn from(p: Profile) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let p: Profile = "1g.5gb".parse().unwrap();
        assert_eq!(p, Profile::new(1, 5));
        assert_eq!(p.to_string(), "1g.5gb");
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        let p: Profile = "  7G.40GB ".parse().unwrap();
        assert_eq!(p, Profile::new(7, 40));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "1g", "1.5gb", "1g.5", "xg.5gb", "1g.ygb", "0g.5gb", "1g.0gb"] {
            assert!(
                matches!(bad.parse::<Profile>(), Err(TypeError::InvalidProfile { .. })),
                "'{bad}' should not parse"
            );
        }
    }

    #[test]
    fn test_ordering_by_slices_then_memory() {
        let mut v = vec![
            Profile::new(3, 20),
            Profile::new(1, 10),
            Profile::new(1, 5),
            Profile::new(2, 10),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Profile::new(1, 5),
                Profile::new(1, 10),
                Profile::new(2, 10),
                Profile::new(3, 20),
            ]
        );
    }

    #[test]
    fn test_serde_as_string() {
        let p = Profile::new(2, 10);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"2g.10gb\"");
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Profile>("\"bogus\"").is_err());
    }
}
