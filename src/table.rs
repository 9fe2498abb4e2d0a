//! Substitution table module
//!
//! Loads `KEY=VALUE` substitution tables (with hashcat `$HEX[...]` notation on
//! either side) and merges them into a single read-only lookup structure that
//! is shared by every generation worker.

use ahash::RandomState;
use anyhow::Context;
use bstr::ByteSlice;
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Prefix of the hashcat hex notation
const HEX_PREFIX: &[u8] = b"$HEX[";

/// Shortest field that can carry hex notation (`$HEX[xx]`)
const HEX_MIN_LEN: usize = 7;

/// Problems with a single table line. These are never fatal: the loader
/// logs them and moves on to the next line.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing '=' separator")]
    MissingSeparator,

    #[error("invalid hex string {value:?}: {source}")]
    InvalidHex {
        value: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("empty pattern")]
    EmptyPattern,
}

/// Mapping from pattern to its ordered replacement options.
///
/// Built once before generation starts and only read afterwards, so it can be
/// shared between threads by reference. A pattern is only registered together
/// with at least one replacement, so every stored option list is non-empty.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    entries: HashMap<Vec<u8>, Vec<Vec<u8>>, RandomState>,
    /// Distinct pattern lengths, longest first
    lengths: Vec<usize>,
}

impl SubstitutionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a replacement option for `pattern`.
    ///
    /// Options keep insertion order and duplicates. Empty patterns are ignored.
    pub fn insert(&mut self, pattern: impl Into<Vec<u8>>, replacement: impl Into<Vec<u8>>) {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return;
        }

        let len = pattern.len();
        self.entries.entry(pattern).or_default().push(replacement.into());

        if !self.lengths.contains(&len) {
            self.lengths.push(len);
            self.lengths.sort_unstable_by(|a, b| b.cmp(a));
        }
    }

    /// Merge another table into this one, concatenating option lists per key
    pub fn merge(&mut self, other: SubstitutionTable) {
        for (pattern, options) in other.entries {
            for option in options {
                self.insert(pattern.clone(), option);
            }
        }
    }

    /// Replacement options registered for `pattern`
    #[inline]
    pub fn get(&self, pattern: &[u8]) -> Option<&[Vec<u8>]> {
        self.entries.get(pattern).map(Vec::as_slice)
    }

    /// Stored pattern and its options, borrowed from the table
    #[inline]
    pub fn get_key_value(&self, pattern: &[u8]) -> Option<(&[u8], &[Vec<u8>])> {
        self.entries
            .get_key_value(pattern)
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Distinct pattern lengths, longest first
    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of replacement options across all patterns
    pub fn option_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Load and merge several table files, in the order given
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Self> {
        let mut table = Self::new();

        for path in paths {
            table.merge(Self::from_file(path.as_ref())?);
        }

        Ok(table)
    }

    /// Load a single table file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open substitution table {:?}", path))?;

        let table = Self::from_reader(BufReader::new(file), &path.display().to_string())
            .with_context(|| format!("Failed to read substitution table {:?}", path))?;

        log::info!(
            "Loaded {} patterns ({} replacements) from {:?}",
            table.len(),
            table.option_count(),
            path
        );

        Ok(table)
    }

    /// Parse a table from any buffered reader.
    ///
    /// `origin` only appears in warnings for skipped lines.
    pub fn from_reader<R: BufRead>(mut reader: R, origin: &str) -> std::io::Result<Self> {
        let mut table = Self::new();
        let mut buf = Vec::with_capacity(256);
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            match parse_line(&buf) {
                Ok(Some((pattern, replacement))) => table.insert(pattern, replacement),
                Ok(None) => {}
                Err(e) => {
                    log::warn!(
                        "{}:{}: skipping {:?}: {}",
                        origin,
                        line_no,
                        buf.trim().as_bstr(),
                        e
                    );
                }
            }
        }

        Ok(table)
    }
}

/// Parse one table line.
///
/// Returns `Ok(None)` for blank lines and `#` comments. The line is split on
/// the first `=` only, so the value may itself contain `=`.
pub fn parse_line(line: &[u8]) -> Result<Option<(Vec<u8>, Vec<u8>)>, TableError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(b"#") {
        return Ok(None);
    }

    let sep = line.find_byte(b'=').ok_or(TableError::MissingSeparator)?;
    let pattern = decode_hex_notation(&line[..sep])?;
    let replacement = decode_hex_notation(&line[sep + 1..])?;

    if pattern.is_empty() {
        return Err(TableError::EmptyPattern);
    }

    Ok(Some((pattern, replacement)))
}

/// Decode `$HEX[...]` notation; any other field is returned as-is.
///
/// Spaces inside the brackets are ignored.
pub fn decode_hex_notation(field: &[u8]) -> Result<Vec<u8>, TableError> {
    if field.len() < HEX_MIN_LEN || !field.starts_with(HEX_PREFIX) || !field.ends_with(b"]") {
        return Ok(field.to_vec());
    }

    let digits: Vec<u8> = field[HEX_PREFIX.len()..field.len() - 1]
        .iter()
        .copied()
        .filter(|&b| b != b' ')
        .collect();

    hex::decode(&digits).map_err(|source| TableError::InvalidHex {
        value: String::from_utf8_lossy(&digits).into_owned(),
        source,
    })
}
