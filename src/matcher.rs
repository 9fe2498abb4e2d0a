//! Pattern matching module
//!
//! Locates registered patterns inside a word. All functions are pure reads
//! over the word and the substitution table.

use crate::table::SubstitutionTable;

/// A place in a specific word where a registered pattern matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'t> {
    /// Byte offset of the match
    pub start: usize,
    /// Length of the matched pattern
    pub len: usize,
    /// Replacement options of the matched pattern
    pub options: &'t [Vec<u8>],
}

impl Occurrence<'_> {
    /// Offset one past the matched span
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether two spans share at least one byte of the original word
    #[inline]
    pub fn overlaps(&self, other: &Occurrence<'_>) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// A distinct pattern present in a word, with its options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentPattern<'t> {
    pub pattern: &'t [u8],
    pub options: &'t [Vec<u8>],
}

/// Patterns matching `word` at `offset`, longest first
#[inline]
pub fn matches_at<'a, 't: 'a>(
    table: &'t SubstitutionTable,
    word: &'a [u8],
    offset: usize,
) -> impl Iterator<Item = Occurrence<'t>> + 'a {
    table.lengths().iter().filter_map(move |&len| {
        let end = offset.checked_add(len)?;
        if end > word.len() {
            return None;
        }
        table.get(&word[offset..end]).map(|options| Occurrence {
            start: offset,
            len,
            options,
        })
    })
}

/// Every match at offsets `>= start`, ordered by offset and then longest first
pub fn find_occurrences_from<'t>(
    table: &'t SubstitutionTable,
    word: &[u8],
    start: usize,
) -> Vec<Occurrence<'t>> {
    (start..word.len())
        .flat_map(|offset| matches_at(table, word, offset))
        .collect()
}

/// Every match anywhere in `word`, overlaps included.
///
/// Ordered by offset and then shortest first.
pub fn find_all_occurrences<'t>(table: &'t SubstitutionTable, word: &[u8]) -> Vec<Occurrence<'t>> {
    let mut occurrences = Vec::new();

    for offset in 0..word.len() {
        let at: Vec<_> = matches_at(table, word, offset).collect();
        occurrences.extend(at.into_iter().rev());
    }

    occurrences
}

/// Distinct patterns occurring at least once in `word`, in lexicographic order
pub fn find_distinct_patterns<'t>(table: &'t SubstitutionTable, word: &[u8]) -> Vec<PresentPattern<'t>> {
    let mut present: Vec<PresentPattern<'t>> = Vec::new();

    for offset in 0..word.len() {
        for &len in table.lengths() {
            let Some(end) = offset.checked_add(len).filter(|&end| end <= word.len()) else {
                continue;
            };
            if let Some((pattern, options)) = table.get_key_value(&word[offset..end]) {
                present.push(PresentPattern { pattern, options });
            }
        }
    }

    present.sort_unstable_by(|a, b| a.pattern.cmp(b.pattern));
    present.dedup_by(|a, b| a.pattern == b.pattern);
    present
}
