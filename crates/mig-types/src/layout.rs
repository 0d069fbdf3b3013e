// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Layout`] data model: a multiset of profile → instance count.
//!
//! A layout is both what callers ask for and what a device reports back.
//! Its *flattened form* lists each profile once per instance and is the
//! unit the permutation search reorders:
//!
//! ```text
//! { 1g.5gb: 2, 2g.10gb: 1 }  ──flatten──►  [1g.5gb, 1g.5gb, 2g.10gb]
//! ```

use crate::{Profile, TypeError};
use std::collections::BTreeMap;
use std::fmt;

/// A partition layout: how many instances of each profile.
///
/// Zero counts are never stored, so a zero entry and an absent entry
/// compare equal.
///
/// # Examples
/// ```
/// use mig_types::{Layout, Profile};
///
/// let mut layout = Layout::new();
/// layout.set(Profile::new(1, 5), 2);
/// layout.set(Profile::new(2, 10), 1);
/// layout.set(Profile::new(3, 20), 0);
///
/// assert_eq!(layout.total_instances(), 3);
/// assert_eq!(layout.flatten().len(), 3);
/// assert_eq!(layout.to_string(), "{1g.5gb: 2, 2g.10gb: 1}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(into = "BTreeMap<Profile, usize>")]
pub struct Layout {
    counts: BTreeMap<Profile, usize>,
}

impl Layout {
    /// Creates the empty layout (no instances).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layout from `(profile, count)` pairs.
    ///
    /// Repeated profiles accumulate; zero counts are dropped.
    pub fn from_counts<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Profile, usize)>,
    {
        let mut counts = BTreeMap::new();
        for (profile, count) in pairs {
            if count > 0 {
                *counts.entry(profile).or_insert(0) += count;
            }
        }
        Self { counts }
    }

    /// Builds a layout from profile-string → count records, the shape
    /// persisted configuration uses.
    pub fn parse_records<'a, I>(records: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let pairs = records
            .into_iter()
            .map(|(name, count)| Ok((name.parse::<Profile>()?, count)))
            .collect::<Result<Vec<_>, TypeError>>()?;
        Ok(Self::from_counts(pairs))
    }

    /// Sets the count for `profile`. A count of zero removes it.
    pub fn set(&mut self, profile: Profile, count: usize) {
        if count == 0 {
            self.counts.remove(&profile);
        } else {
            self.counts.insert(profile, count);
        }
    }

    /// Adds one instance of `profile`.
    pub fn increment(&mut self, profile: Profile) {
        *self.counts.entry(profile).or_insert(0) += 1;
    }

    /// Instances requested for `profile` (zero when absent).
    pub fn count(&self, profile: &Profile) -> usize {
        self.counts.get(profile).copied().unwrap_or(0)
    }

    /// Returns `true` if at least one instance of `profile` is present.
    pub fn contains(&self, profile: &Profile) -> bool {
        self.counts.contains_key(profile)
    }

    /// Total number of instances across all profiles.
    pub fn total_instances(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns `true` for the layout with no instances.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(profile, count)` pairs in profile order.
    pub fn iter(&self) -> impl Iterator<Item = (&Profile, usize)> + '_ {
        self.counts.iter().map(|(p, &c)| (p, c))
    }

    /// Per-profile multiplicities, in profile order.
    pub fn multiplicities(&self) -> Vec<usize> {
        self.counts.values().copied().collect()
    }

    /// Expands the layout into one entry per instance, sorted by profile.
    pub fn flatten(&self) -> Vec<Profile> {
        self.counts
            .iter()
            .flat_map(|(&p, &c)| std::iter::repeat(p).take(c))
            .collect()
    }
}

impl From<Layout> for BTreeMap<Profile, usize> {
    fn from(layout: Layout) -> Self {
        layout.counts
    }
}

/// Deserializes from a map of profile → count. Keys naming the same
/// profile (e.g. `"1g.5gb"` and `"1G.5GB"`) accumulate, like
/// [`Layout::from_counts`].
impl<'de> serde::Deserialize<'de> for Layout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct LayoutVisitor;

        impl<'de> serde::de::Visitor<'de> for LayoutVisitor {
            type Value = Layout;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of MIG profile to instance count")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Layout, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut pairs = Vec::new();
                while let Some(entry) = map.next_entry::<Profile, usize>()? {
                    pairs.push(entry);
                }
                Ok(Layout::from_counts(pairs))
            }
        }

        deserializer.deserialize_map(LayoutVisitor)
    }
}

impl FromIterator<Profile> for Layout {
    /// Counts profile occurrences, the inverse of [`Layout::flatten`].
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        let mut layout = Layout::new();
        for p in iter {
            layout.increment(p);
        }
        layout
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (profile, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{profile}: {count}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: Profile = Profile::new(1, 5);
    const P2: Profile = Profile::new(2, 10);
    const P3: Profile = Profile::new(3, 20);

    #[test]
    fn test_zero_counts_equal_absent() {
        let a = Layout::from_counts([(P1, 2), (P3, 0)]);
        let b = Layout::from_counts([(P1, 2)]);
        assert_eq!(a, b);

        let mut c = b.clone();
        c.set(P2, 0);
        assert_eq!(c, b);
        assert!(!c.contains(&P2));
    }

    #[test]
    fn test_flatten_is_sorted_multiset() {
        let layout = Layout::from_counts([(P3, 1), (P1, 2)]);
        assert_eq!(layout.flatten(), vec![P1, P1, P3]);
        assert_eq!(layout.multiplicities(), vec![2, 1]);
        assert_eq!(layout.total_instances(), 3);
    }

    #[test]
    fn test_from_iter_inverts_flatten() {
        let layout = Layout::from_counts([(P1, 3), (P2, 1), (P3, 1)]);
        let rebuilt: Layout = layout.flatten().into_iter().rev().collect();
        assert_eq!(rebuilt, layout);
    }

    #[test]
    fn test_from_counts_accumulates() {
        let layout = Layout::from_counts([(P1, 1), (P1, 2)]);
        assert_eq!(layout.count(&P1), 3);
    }

    #[test]
    fn test_parse_records() {
        let layout = Layout::parse_records([("1g.5gb", 4), ("3g.20gb", 1)]).unwrap();
        assert_eq!(layout.count(&P1), 4);
        assert_eq!(layout.count(&P3), 1);
        assert!(Layout::parse_records([("1x.5gb", 1)]).is_err());
    }

    #[test]
    fn test_empty() {
        let layout = Layout::new();
        assert!(layout.is_empty());
        assert!(layout.flatten().is_empty());
        assert_eq!(layout.to_string(), "{}");
    }

    #[test]
    fn test_serde_drops_zero_entries() {
        let layout: Layout = serde_json::from_str(r#"{"1g.5gb": 2, "2g.10gb": 0}"#).unwrap();
        assert_eq!(layout, Layout::from_counts([(P1, 2)]));
        assert_eq!(serde_json::to_string(&layout).unwrap(), r#"{"1g.5gb":2}"#);
    }

    #[test]
    fn test_serde_equivalent_keys_accumulate() {
        let layout: Layout = serde_json::from_str(r#"{"1g.5gb": 1, "1G.5GB": 2, " 2g.10gb ": 1}"#).unwrap();
        assert_eq!(layout, Layout::from_counts([(P1, 3), (P2, 1)]));
    }
}
