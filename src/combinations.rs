//! Combination enumeration
//!
//! Lazily enumerates the size-`k` index subsets of `{0..n-1}` used by the
//! reverse occurrence algorithm, and checks candidate subsets for overlap.

use crate::matcher::Occurrence;

/// Iterator over all `k`-element subsets of `{0..n-1}`.
///
/// Each subset is yielded as a strictly descending index list. Subsets come
/// in descending lexicographic order, built from the top index downward:
/// `combinations(4, 2)` yields `[3,2] [3,1] [3,0] [2,1] [2,0] [1,0]`.
/// `k == 0` yields the empty subset once; `k > n` yields nothing.
#[derive(Debug, Clone)]
pub struct Combinations {
    current: Vec<usize>,
    done: bool,
}

/// Enumerate all size-`k` subsets of `{0..n-1}`
pub fn combinations(n: usize, k: usize) -> Combinations {
    Combinations {
        current: (n.saturating_sub(k)..n).rev().collect(),
        done: k > n,
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.current.clone();
        let k = self.current.len();

        // Rightmost slot that can still move down; slot j never goes below k-1-j.
        match (0..k).rev().find(|&j| self.current[j] > k - 1 - j) {
            Some(j) => {
                self.current[j] -= 1;
                for i in j + 1..k {
                    self.current[i] = self.current[i - 1] - 1;
                }
            }
            None => self.done = true,
        }

        Some(item)
    }
}

/// Whether the selected occurrences are pairwise disjoint in the original word
pub fn is_non_overlapping(combo: &[usize], occurrences: &[Occurrence<'_>]) -> bool {
    let mut spans: Vec<(usize, usize)> = combo
        .iter()
        .map(|&idx| (occurrences[idx].start, occurrences[idx].end()))
        .collect();

    spans.sort_unstable_by_key(|&(start, _)| start);

    spans.windows(2).all(|pair| pair[1].0 >= pair[0].1)
}
