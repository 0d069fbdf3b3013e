// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Duplicate-aware permutation generation.
//!
//! Naively permuting `[A, A, B]` produces six orderings, but only three
//! are distinct. [`DistinctPermutations`] starts from the sorted sequence
//! and steps to the next lexicographically greater one, so equal elements
//! are never swapped with each other and each distinct ordering appears
//! exactly once:
//!
//! ```text
//! [A, A, B] → [A, B, A] → [B, A, A] → done
//! ```
//!
//! For multiplicities `c₁..cₖ` with `n = Σcᵢ` that is `n! / (c₁!·…·cₖ!)`
//! orderings, see [`distinct_permutation_count`].

/// Iterator over the distinct permutations of a multiset.
///
/// # Example
/// ```
/// use mig_planner::DistinctPermutations;
///
/// let perms: Vec<Vec<char>> = DistinctPermutations::new(vec!['b', 'a', 'a']).collect();
/// assert_eq!(perms, vec![
///     vec!['a', 'a', 'b'],
///     vec!['a', 'b', 'a'],
///     vec!['b', 'a', 'a'],
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct DistinctPermutations<T> {
    current: Vec<T>,
    exhausted: bool,
}

impl<T: Ord + Clone> DistinctPermutations<T> {
    /// Creates the generator. Input order does not matter.
    ///
    /// An empty input yields exactly one (empty) permutation.
    pub fn new(mut items: Vec<T>) -> Self {
        items.sort();
        Self {
            current: items,
            exhausted: false,
        }
    }
}

impl<T: Ord + Clone> Iterator for DistinctPermutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let out = self.current.clone();
        self.exhausted = !next_permutation(&mut self.current);
        Some(out)
    }
}

/// Rearranges `v` into the next lexicographically greater permutation.
///
/// Returns `false` (leaving `v` untouched) when `v` is already the
/// greatest, i.e. sorted in non-increasing order.
fn next_permutation<T: Ord>(v: &mut [T]) -> bool {
    if v.len() < 2 {
        return false;
    }

    // Longest non-increasing suffix starts at `pivot`.
    let mut pivot = v.len() - 1;
    while pivot > 0 && v[pivot - 1] >= v[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }

    // Rightmost element strictly greater than the one before the suffix.
    let mut successor = v.len() - 1;
    while v[successor] <= v[pivot - 1] {
        successor -= 1;
    }

    v.swap(pivot - 1, successor);
    v[pivot..].reverse();
    true
}

/// Number of distinct orderings of a multiset: `n! / (c₁!·…·cₖ!)`.
///
/// Computed as a running product of binomial coefficients so that the
/// intermediate values stay exact and small. Saturates at `u64::MAX`.
///
/// ```
/// use mig_planner::distinct_permutation_count;
///
/// assert_eq!(distinct_permutation_count(&[2, 1]), 3);
/// assert_eq!(distinct_permutation_count(&[7]), 1);
/// assert_eq!(distinct_permutation_count(&[]), 1);
/// ```
pub fn distinct_permutation_count(multiplicities: &[usize]) -> u64 {
    let mut total: u128 = 1;
    let mut n: u128 = 0;

    for &c in multiplicities {
        for i in 1..=c as u128 {
            n += 1;
            total = match total.checked_mul(n) {
                Some(t) => t / i,
                None => return u64::MAX,
            };
        }
    }

    u64::try_from(total).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn factorial(n: u64) -> u64 {
        (1..=n).product()
    }

    #[test]
    fn test_count_matches_factorial_formula() {
        let cases: &[&[usize]] = &[&[1], &[3], &[2, 1], &[1, 1, 1], &[3, 2], &[2, 2, 1, 1], &[1, 1, 1, 1, 1, 1, 1]];
        for &m in cases {
            let n: usize = m.iter().sum();
            let expected = factorial(n as u64) / m.iter().map(|&c| factorial(c as u64)).product::<u64>();
            assert_eq!(distinct_permutation_count(m), expected, "multiplicities {m:?}");
        }
    }

    #[test]
    fn test_generator_visits_each_distinct_once() {
        let input = vec![1, 1, 2, 2, 2, 3];
        let perms: Vec<Vec<i32>> = DistinctPermutations::new(input).collect();
        let unique: HashSet<&Vec<i32>> = perms.iter().collect();

        assert_eq!(perms.len(), unique.len());
        assert_eq!(perms.len() as u64, distinct_permutation_count(&[2, 3, 1]));
    }

    #[test]
    fn test_generator_lexicographic() {
        let perms: Vec<Vec<u8>> = DistinctPermutations::new(vec![3, 1, 2]).collect();
        let mut sorted = perms.clone();
        sorted.sort();
        assert_eq!(perms, sorted);
        assert_eq!(perms.len(), 6);
    }

    #[test]
    fn test_all_identical_single_ordering() {
        let perms: Vec<Vec<char>> = DistinctPermutations::new(vec!['x'; 5]).collect();
        assert_eq!(perms, vec![vec!['x'; 5]]);
    }

    #[test]
    fn test_empty_yields_one_empty() {
        let perms: Vec<Vec<u8>> = DistinctPermutations::new(vec![]).collect();
        assert_eq!(perms, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(distinct_permutation_count(&[1; 40]), u64::MAX);
    }
}
