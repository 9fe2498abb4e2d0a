//! Variant generation module
//!
//! Four traversals over a word and a substitution table:
//!
//! - **Forward** (occurrence-level): depth-first over single spans, fewest
//!   substitutions first, every replacement option explored.
//! - **Reverse** (occurrence-level): subsets of matched spans, most
//!   substitutions first, first replacement option only.
//! - **Substitute-all** (pattern-level): one decision per distinct pattern,
//!   applied to every occurrence of that pattern.
//! - **Substitute-all reverse** (pattern-level): starts with every distinct
//!   pattern selected and removes them one at a time, first option only.
//!
//! Variants are handed to a caller-supplied sink as they are produced. The
//! algorithms are total: words without matches simply produce nothing.

use crate::combinations::{combinations, is_non_overlapping};
use crate::matcher::{find_all_occurrences, find_distinct_patterns, find_occurrences_from, Occurrence, PresentPattern};
use crate::table::SubstitutionTable;
use bstr::ByteSlice;
use std::fmt;

/// Inclusive bounds on the substitution count of emitted variants.
///
/// A minimum of zero is raised to one: zero substitutions would only
/// reproduce the input word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    min: usize,
    max: usize,
}

impl Bounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min: min.max(1), max }
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    #[inline]
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1, 15)
    }
}

/// Which generation algorithm to run for every word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Occurrence-level, fewest substitutions first
    Forward,
    /// Occurrence-level, most substitutions first
    Reverse,
    /// Pattern-level, every option of every pattern
    SubstituteAll,
    /// Pattern-level, all patterns first then fewer
    SubstituteAllReverse,
}

impl Strategy {
    /// Pick a strategy from the mode and direction switches
    pub fn from_flags(substitute_all: bool, reverse: bool) -> Self {
        match (substitute_all, reverse) {
            (false, false) => Self::Forward,
            (false, true) => Self::Reverse,
            (true, false) => Self::SubstituteAll,
            (true, true) => Self::SubstituteAllReverse,
        }
    }

    /// Run this strategy over one word
    pub fn generate<F>(self, word: &[u8], table: &SubstitutionTable, bounds: Bounds, emit: &mut F)
    where
        F: FnMut(Vec<u8>),
    {
        match self {
            Self::Forward => generate_forward(word, table, bounds, emit),
            Self::Reverse => generate_reverse(word, table, bounds, emit),
            Self::SubstituteAll => generate_all_toggle(word, table, bounds, emit),
            Self::SubstituteAllReverse => generate_all_toggle_reverse(word, table, bounds, emit),
        }
    }

    /// Collect every variant of `word` into a vector, in emission order
    pub fn collect(self, word: &[u8], table: &SubstitutionTable, bounds: Bounds) -> Vec<Vec<u8>> {
        let mut variants = Vec::new();
        self.generate(word, table, bounds, &mut |variant| variants.push(variant));
        variants
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::SubstituteAll => "substitute-all",
            Self::SubstituteAllReverse => "substitute-all reverse",
        };
        f.write_str(name)
    }
}

/// Occurrence-level generation, fewest substitutions first.
///
/// At every position from the cursor onward, each matching pattern (longest
/// first) and each of its options yields a candidate with that one span
/// replaced. The candidate is emitted when its count is within bounds, then
/// explored further from just past the inserted replacement, so a single
/// path never substitutes inside text it already replaced.
pub fn generate_forward<F>(word: &[u8], table: &SubstitutionTable, bounds: Bounds, emit: &mut F)
where
    F: FnMut(Vec<u8>),
{
    fn walk<F: FnMut(Vec<u8>)>(
        current: &[u8],
        count: usize,
        cursor: usize,
        table: &SubstitutionTable,
        bounds: Bounds,
        emit: &mut F,
    ) {
        let next_count = count + 1;
        if next_count > bounds.max {
            return;
        }

        for occurrence in find_occurrences_from(table, current, cursor) {
            for replacement in occurrence.options {
                let candidate = splice(current, &occurrence, replacement);

                // Nothing deeper fits under the maximum.
                if next_count == bounds.max {
                    if next_count >= bounds.min {
                        emit(candidate);
                    }
                    continue;
                }

                if next_count >= bounds.min {
                    emit(candidate.clone());
                }
                walk(
                    &candidate,
                    next_count,
                    occurrence.start + replacement.len(),
                    table,
                    bounds,
                    emit,
                );
            }
        }
    }

    walk(word, 0, 0, table, bounds, emit);
}

/// Occurrence-level generation, most substitutions first.
///
/// Every match in the word (overlaps included) is a candidate span. For each
/// count from `min(max, spans)` down to `min`, every subset of that size
/// whose spans are disjoint in the original word is applied, using the first
/// replacement option of each span.
pub fn generate_reverse<F>(word: &[u8], table: &SubstitutionTable, bounds: Bounds, emit: &mut F)
where
    F: FnMut(Vec<u8>),
{
    let occurrences = find_all_occurrences(table, word);
    let total = occurrences.len();
    if total < bounds.min {
        return;
    }

    let top = bounds.max.min(total);
    for count in (bounds.min..=top).rev() {
        for combo in combinations(total, count) {
            if !is_non_overlapping(&combo, &occurrences) {
                continue;
            }
            emit(compose(word, &combo, &occurrences));
        }
    }
}

/// Pattern-level generation.
///
/// Walks the power set of the distinct patterns present in the word. Each
/// pattern is either substituted (once per option) or left alone; the count
/// is the number of patterns substituted, however often they occur. Leaves
/// within bounds replace every occurrence of each selected pattern.
pub fn generate_all_toggle<F>(word: &[u8], table: &SubstitutionTable, bounds: Bounds, emit: &mut F)
where
    F: FnMut(Vec<u8>),
{
    fn toggle<F: FnMut(Vec<u8>)>(
        word: &[u8],
        patterns: &[PresentPattern<'_>],
        selected: Option<&Selection<'_>>,
        count: usize,
        bounds: Bounds,
        emit: &mut F,
    ) {
        if count > bounds.max || count + patterns.len() < bounds.min {
            return;
        }

        let Some((head, rest)) = patterns.split_first() else {
            let mut chosen = Vec::with_capacity(count);
            let mut node = selected;
            while let Some(selection) = node {
                chosen.push((selection.pattern, selection.replacement));
                node = selection.rest;
            }
            chosen.reverse();
            emit(replace_all(word, chosen));
            return;
        };

        for replacement in head.options {
            let node = Selection {
                pattern: head.pattern,
                replacement,
                rest: selected,
            };
            toggle(word, rest, Some(&node), count + 1, bounds, emit);
        }

        toggle(word, rest, selected, count, bounds, emit);
    }

    let patterns = find_distinct_patterns(table, word);
    toggle(word, &patterns, None, 0, bounds, emit);
}

/// Pattern-level generation, most substitutions first.
///
/// Starts with every distinct pattern selected (first option each) and
/// removes patterns one at a time in increasing order, so each subset is
/// visited once. Every visited subset whose size is within bounds is
/// emitted; a branch stops once its size reaches the minimum.
pub fn generate_all_toggle_reverse<F>(word: &[u8], table: &SubstitutionTable, bounds: Bounds, emit: &mut F)
where
    F: FnMut(Vec<u8>),
{
    fn shrink<F: FnMut(Vec<u8>)>(
        word: &[u8],
        patterns: &[PresentPattern<'_>],
        kept: &[bool],
        count: usize,
        pos: usize,
        bounds: Bounds,
        emit: &mut F,
    ) {
        if count < bounds.min {
            return;
        }

        if bounds.contains(count) {
            let chosen = patterns
                .iter()
                .zip(kept)
                .filter(|(_, keep)| **keep)
                .filter_map(|(p, _)| p.options.first().map(|r| (p.pattern, r.as_slice())));
            emit(replace_all(word, chosen));
        }

        if count == bounds.min {
            return;
        }

        for i in pos..patterns.len() {
            let mut next = kept.to_vec();
            next[i] = false;
            shrink(word, patterns, &next, count - 1, i + 1, bounds, emit);
        }
    }

    let patterns = find_distinct_patterns(table, word);
    if patterns.len() < bounds.min {
        return;
    }

    let kept = vec![true; patterns.len()];
    shrink(word, &patterns, &kept, patterns.len(), 0, bounds, emit);
}

/// One selected pattern on a substitute-all branch. Nodes live in the
/// recursion frames and link to their parent, so sibling branches never see
/// each other's choices.
struct Selection<'s> {
    pattern: &'s [u8],
    replacement: &'s [u8],
    rest: Option<&'s Selection<'s>>,
}

/// Replace a single span of `word`
fn splice(word: &[u8], occurrence: &Occurrence<'_>, replacement: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(word.len() - occurrence.len + replacement.len());
    result.extend_from_slice(&word[..occurrence.start]);
    result.extend_from_slice(replacement);
    result.extend_from_slice(&word[occurrence.end()..]);
    result
}

/// Apply the selected occurrences of a combination left to right.
///
/// Spans are addressed in original-word coordinates, so copying the
/// untouched gaps between them keeps earlier length changes from shifting
/// later spans.
fn compose(word: &[u8], combo: &[usize], occurrences: &[Occurrence<'_>]) -> Vec<u8> {
    let mut selected: Vec<&Occurrence<'_>> = combo.iter().map(|&idx| &occurrences[idx]).collect();
    selected.sort_unstable_by_key(|o| o.start);

    let mut result = Vec::with_capacity(word.len());
    let mut cursor = 0;
    for occurrence in selected {
        let original = &word[occurrence.start..occurrence.end()];
        let replacement = occurrence.options.first().map_or(original, Vec::as_slice);

        result.extend_from_slice(&word[cursor..occurrence.start]);
        result.extend_from_slice(replacement);
        cursor = occurrence.end();
    }
    result.extend_from_slice(&word[cursor..]);
    result
}

/// Replace every occurrence of each pattern, in the order given
fn replace_all<'p>(word: &[u8], chosen: impl IntoIterator<Item = (&'p [u8], &'p [u8])>) -> Vec<u8> {
    let mut result = word.to_vec();
    for (pattern, replacement) in chosen {
        result = result.replace(pattern, replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [Strategy; 4] = [
        Strategy::Forward,
        Strategy::Reverse,
        Strategy::SubstituteAll,
        Strategy::SubstituteAllReverse,
    ];

    fn table(pairs: &[(&str, &str)]) -> SubstitutionTable {
        let mut table = SubstitutionTable::new();
        for (k, v) in pairs {
            table.insert(*k, *v);
        }
        table
    }

    fn run(strategy: Strategy, word: &str, table: &SubstitutionTable, min: usize, max: usize) -> Vec<String> {
        strategy
            .collect(word.as_bytes(), table, Bounds::new(min, max))
            .into_iter()
            .map(|v| String::from_utf8(v).unwrap())
            .collect()
    }

    fn differing(a: &str, b: &str) -> usize {
        a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn test_bounds_clamp_min() {
        let bounds = Bounds::new(0, 3);
        assert_eq!(bounds.min(), 1);
        assert!(!bounds.contains(0));
        assert!(bounds.contains(3));
        assert!(!bounds.contains(4));
    }

    #[test]
    fn test_strategy_from_flags() {
        assert_eq!(Strategy::from_flags(false, false), Strategy::Forward);
        assert_eq!(Strategy::from_flags(false, true), Strategy::Reverse);
        assert_eq!(Strategy::from_flags(true, false), Strategy::SubstituteAll);
        assert_eq!(Strategy::from_flags(true, true), Strategy::SubstituteAllReverse);
    }

    #[test]
    fn test_forward_foo() {
        let table = table(&[("o", "0")]);
        assert_eq!(run(Strategy::Forward, "foo", &table, 1, 2), vec!["f0o", "f00", "fo0"]);
    }

    #[test]
    fn test_forward_min_zero_behaves_as_one() {
        let table = table(&[("o", "0")]);
        assert_eq!(
            run(Strategy::Forward, "foo", &table, 0, 2),
            run(Strategy::Forward, "foo", &table, 1, 2)
        );
    }

    #[test]
    fn test_forward_min_filters_but_still_explores() {
        let table = table(&[("o", "0")]);
        assert_eq!(run(Strategy::Forward, "foo", &table, 2, 2), vec!["f00"]);
    }

    #[test]
    fn test_forward_all_options_and_longest_first() {
        let table = table(&[("a", "4"), ("a", "@"), ("ab", "X")]);
        assert_eq!(run(Strategy::Forward, "ab", &table, 1, 3), vec!["X", "4b", "@b"]);
    }

    #[test]
    fn test_forward_never_rewrites_inserted_text() {
        // "a" -> "aa" must not cascade into the text it just inserted.
        let table = table(&[("a", "aa")]);
        assert_eq!(run(Strategy::Forward, "a", &table, 1, 5), vec!["aa"]);
        assert_eq!(run(Strategy::Forward, "ab", &table, 1, 5), vec!["aab"]);
    }

    #[test]
    fn test_reverse_descending_counts() {
        let table = table(&[("a", "4")]);
        assert_eq!(
            run(Strategy::Reverse, "aaa", &table, 1, 3),
            vec!["444", "a44", "4a4", "44a", "aa4", "a4a", "4aa"]
        );
        assert_eq!(run(Strategy::Reverse, "aaa", &table, 1, 1), vec!["aa4", "a4a", "4aa"]);
    }

    #[test]
    fn test_reverse_skips_overlaps() {
        let table = table(&[("a", "4"), ("ab", "X")]);
        assert_eq!(run(Strategy::Reverse, "ab", &table, 1, 2), vec!["X", "4b"]);
    }

    #[test]
    fn test_reverse_composes_length_changes() {
        let table = table(&[("a", "xx"), ("c", "yy")]);
        assert_eq!(run(Strategy::Reverse, "abc", &table, 2, 2), vec!["xxbyy"]);
    }

    #[test]
    fn test_reverse_first_option_only() {
        let table = table(&[("o", "0"), ("o", "()")]);
        assert_eq!(run(Strategy::Reverse, "foo", &table, 2, 2), vec!["f00"]);
    }

    #[test]
    fn test_reverse_too_few_occurrences() {
        let table = table(&[("o", "0")]);
        assert!(run(Strategy::Reverse, "foo", &table, 3, 5).is_empty());
    }

    #[test]
    fn test_substitute_all_foo() {
        let table = table(&[("o", "0")]);
        assert_eq!(run(Strategy::SubstituteAll, "foo", &table, 1, 1), vec!["f00"]);
        assert_eq!(run(Strategy::SubstituteAllReverse, "foo", &table, 1, 1), vec!["f00"]);
    }

    #[test]
    fn test_substitute_all_branch_order() {
        let table = table(&[("a", "4"), ("b", "8")]);
        assert_eq!(run(Strategy::SubstituteAll, "abab", &table, 1, 2), vec!["4848", "4b4b", "a8a8"]);
        assert_eq!(run(Strategy::SubstituteAll, "abab", &table, 1, 1), vec!["4b4b", "a8a8"]);
        assert_eq!(run(Strategy::SubstituteAll, "abab", &table, 2, 2), vec!["4848"]);
    }

    #[test]
    fn test_substitute_all_every_option() {
        let table = table(&[("a", "4"), ("a", "@")]);
        assert_eq!(run(Strategy::SubstituteAll, "aa", &table, 1, 1), vec!["44", "@@"]);
        assert_eq!(run(Strategy::SubstituteAllReverse, "aa", &table, 1, 1), vec!["44"]);
    }

    #[test]
    fn test_substitute_all_reverse_order() {
        let table = table(&[("a", "4"), ("b", "8"), ("c", "(")]);
        assert_eq!(
            run(Strategy::SubstituteAllReverse, "abc", &table, 1, 3),
            vec!["48(", "a8(", "ab(", "a8c", "4b(", "4bc", "48c"]
        );
        assert_eq!(
            run(Strategy::SubstituteAllReverse, "abc", &table, 2, 2),
            vec!["a8(", "4b(", "48c"]
        );
    }

    #[test]
    fn test_substitute_all_reverse_too_few_patterns() {
        let table = table(&[("a", "4")]);
        assert!(run(Strategy::SubstituteAllReverse, "aaaa", &table, 2, 4).is_empty());
    }

    #[test]
    fn test_empty_table_emits_nothing() {
        let empty = SubstitutionTable::new();
        for strategy in ALL {
            for (min, max) in [(0, 0), (0, 15), (1, 1), (3, 2)] {
                assert!(run(strategy, "password", &empty, min, max).is_empty(), "{strategy}");
            }
        }
    }

    #[test]
    fn test_empty_word_and_no_match() {
        let table = table(&[("x", "y")]);
        for strategy in ALL {
            assert!(run(strategy, "", &table, 1, 15).is_empty());
            assert!(run(strategy, "hello", &table, 1, 15).is_empty());
        }
    }

    #[test]
    fn test_counts_within_bounds() {
        let table = table(&[("a", "4"), ("s", "5"), ("o", "0")]);
        let word = "password";

        for strategy in [Strategy::Forward, Strategy::Reverse] {
            let variants = run(strategy, word, &table, 2, 3);
            assert!(!variants.is_empty());
            for v in &variants {
                let count = differing(word, v);
                assert!((2..=3).contains(&count), "{strategy}: {v} has {count}");
            }
        }

        for strategy in [Strategy::SubstituteAll, Strategy::SubstituteAllReverse] {
            let variants = run(strategy, word, &table, 2, 2);
            assert_eq!(variants.len(), 3);
            for v in &variants {
                let toggled = ["a", "s", "o"]
                    .iter()
                    .filter(|p| !v.contains(**p))
                    .count();
                assert_eq!(toggled, 2, "{strategy}: {v}");
            }
        }
    }

    #[test]
    fn test_pattern_count_ignores_occurrences() {
        let table = table(&[("s", "$")]);
        assert_eq!(run(Strategy::SubstituteAll, "sassy", &table, 1, 1), vec!["$a$$y"]);
        assert!(run(Strategy::SubstituteAll, "sassy", &table, 2, 3).is_empty());
    }

    #[test]
    fn test_forward_and_reverse_agree_on_disjoint_patterns() {
        let table = table(&[("a", "4"), ("s", "5"), ("o", "0")]);

        let forward: HashSet<_> = run(Strategy::Forward, "password", &table, 1, 4).into_iter().collect();
        let reverse: Vec<_> = run(Strategy::Reverse, "password", &table, 1, 4);
        let reverse_set: HashSet<_> = reverse.iter().cloned().collect();

        assert_eq!(reverse.len(), reverse_set.len());
        assert_eq!(forward, reverse_set);
        assert_eq!(forward.len(), 15);
    }
}
