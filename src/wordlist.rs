//! Dictionary reading module
//!
//! Memory-maps the dictionary and yields one word per line as raw bytes.
//! No transcoding is done: a word is exactly the bytes between line breaks.

use anyhow::Context;
use std::fs::File;
use std::path::Path;

/// Memory-mapped line iterator over a dictionary file
pub struct MmapLineIterator {
    mmap: Option<memmap2::Mmap>,
    position: usize,
}

impl MmapLineIterator {
    /// Open and map a dictionary file
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary {:?}", path))?;
        let len = file.metadata()?.len();

        // Empty files cannot be mapped on every platform.
        let mmap = if len == 0 {
            None
        } else {
            Some(unsafe { memmap2::Mmap::map(&file) }
                .with_context(|| format!("Failed to map dictionary {:?}", path))?)
        };

        Ok(Self { mmap, position: 0 })
    }

    /// Get the total size of the file
    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }
}

impl Iterator for MmapLineIterator {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let data: &[u8] = self.mmap.as_deref()?;
        if self.position >= data.len() {
            return None;
        }

        let remaining = &data[self.position..];
        let line_end = memchr::memchr(b'\n', remaining)
            .map(|i| i + 1)
            .unwrap_or(remaining.len());

        self.position += line_end;
        Some(strip_line_ending(&remaining[..line_end]).to_vec())
    }
}

/// Remove a trailing `\n` and then a trailing `\r`
#[inline]
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_line_iterator() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "line1\nline2\r\n\n  spaced \nlast").unwrap();
        file.flush().unwrap();

        let iter = MmapLineIterator::new(file.path()).unwrap();
        let lines: Vec<_> = iter.collect();

        assert_eq!(
            lines,
            vec![
                b"line1".to_vec(),
                b"line2".to_vec(),
                b"".to_vec(),
                b"  spaced ".to_vec(),
                b"last".to_vec(),
            ]
        );
    }

    #[test]
    fn test_raw_bytes_preserved() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'a', b'\n', 0xc3, 0x28, b'\n']).unwrap();
        file.flush().unwrap();

        let lines: Vec<_> = MmapLineIterator::new(file.path()).unwrap().collect();
        assert_eq!(lines, vec![vec![0xff, 0xfe, b'a'], vec![0xc3, 0x28]]);
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let mut iter = MmapLineIterator::new(file.path()).unwrap();

        assert_eq!(iter.size(), 0);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_missing_file() {
        assert!(MmapLineIterator::new(Path::new("/nonexistent/dict.txt")).is_err());
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending(b"word\r\n"), b"word");
        assert_eq!(strip_line_ending(b"word\n"), b"word");
        assert_eq!(strip_line_ending(b"word\r"), b"word");
        assert_eq!(strip_line_ending(b"word"), b"word");
    }
}
