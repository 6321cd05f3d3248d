//! Newline frame codec.
//!
//! Wire format: UTF-8 text, one command per `\n`-terminated line (`\r\n`
//! is accepted; the `\r` is stripped by the parser's trim).
//!
//! The buffer accumulates bytes across ticks and yields complete lines.
//! A single read may deliver part of a line or several lines at once.
//! Capacity is fixed: a peer that fills the buffer without sending a
//! newline is misbehaving, and the caller drops the session.

use heapless::Vec;

/// Longest accepted line, newline included.
pub const MAX_LINE_LEN: usize = 128;

/// Streaming line accumulator.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8, MAX_LINE_LEN>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Bytes that can still be fed.
    pub fn free(&self) -> usize {
        MAX_LINE_LEN - self.buf.len()
    }

    /// Append as much of `data` as fits. Returns the number of bytes taken.
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.free());
        // n <= free, cannot overflow.
        let _ = self.buf.extend_from_slice(&data[..n]);
        n
    }

    /// Whether a complete line is buffered.
    pub fn has_line(&self) -> bool {
        self.buf.contains(&b'\n')
    }

    /// Full and no newline in sight.
    pub fn is_full(&self) -> bool {
        self.free() == 0 && !self.has_line()
    }

    /// Pop the oldest complete line, without its `\n`.
    pub fn next_line(&mut self) -> Option<Vec<u8, MAX_LINE_LEN>> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line = Vec::new();
        let _ = line.extend_from_slice(&self.buf[..pos]);

        let len = self.buf.len();
        self.buf.copy_within(pos + 1..len, 0);
        self.buf.truncate(len - pos - 1);
        Some(line)
    }
}
