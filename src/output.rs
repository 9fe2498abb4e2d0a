//! Output management module
//!
//! Handles writing generated variants to the output sink with buffering for
//! performance. Only the single sink thread owns a writer.

use std::io::{self, BufWriter, Write};

/// Default buffer size for the variant stream (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Buffered, newline-terminated variant writer
pub struct OutputWriter<W: Write> {
    writer: BufWriter<W>,
    lines_written: u64,
    bytes_written: u64,
}

impl<W: Write> OutputWriter<W> {
    /// Wrap a destination with a buffer of `buffer_size` bytes
    pub fn new(inner: W, buffer_size: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(buffer_size, inner),
            lines_written: 0,
            bytes_written: 0,
        }
    }

    /// Write one variant followed by a line terminator
    pub fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1; // +1 for newline
        Ok(())
    }

    /// Flush the buffer to the destination
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get number of lines written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Get bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl<W: Write> Drop for OutputWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
