// src/common/framer.rs

//! Line framing for the inbound byte stream.
//!
//! The companion host answers with one text line per reply. Bytes arrive one at
//! a time from the receive queue; [`LineFramer`] keeps printable ASCII, treats
//! `\r` and `\n` as terminators and drops everything else. Memory use is fixed:
//! an over-long line is truncated, never grown.

use core::fmt;

use heapless::{Deque, Vec};
use log::{trace, warn};

/// Maximum number of bytes kept for one line.
pub const LINE_MAX: usize = 1024;

/// Completed lines held until [`LineFramer::take_line`] collects them.
pub const PENDING_LINES: usize = 4;

/// A complete, non-empty line of printable ASCII (32..=126).
#[derive(Clone, PartialEq, Eq)]
pub struct RawLine(Vec<u8, LINE_MAX>);

impl RawLine {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The line as text. Always valid, the framer only admits ASCII.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for lines produced by the framer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&[u8]> for RawLine {
    type Error = ();

    /// Builds a line from bytes that are already printable ASCII.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.is_empty() || !bytes.iter().all(|b| is_printable(*b)) {
            return Err(());
        }
        Vec::from_slice(bytes).map(RawLine)
    }
}

impl fmt::Debug for RawLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawLine({:?})", self.as_str())
    }
}

impl fmt::Display for RawLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
pub const fn is_printable(byte: u8) -> bool {
    matches!(byte, 32..=126)
}

#[inline]
pub const fn is_terminator(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r')
}

/// Counters for input the framer had to throw away.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FramerStats {
    /// Non-printable, non-terminator bytes.
    pub dropped_bytes: u32,
    /// Lines that hit [`LINE_MAX`] and lost their tail.
    pub truncated_lines: u32,
    /// Completed lines evicted because nobody collected them.
    pub discarded_lines: u32,
}

/// Assembles terminator-delimited lines from single bytes.
#[derive(Debug)]
pub struct LineFramer {
    current: Vec<u8, LINE_MAX>,
    overflowed: bool,
    pending: Deque<RawLine, PENDING_LINES>,
    stats: FramerStats,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    pub const fn new() -> Self {
        Self {
            current: Vec::new(),
            overflowed: false,
            pending: Deque::new(),
            stats: FramerStats {
                dropped_bytes: 0,
                truncated_lines: 0,
                discarded_lines: 0,
            },
        }
    }

    /// Feeds one received byte.
    ///
    /// Returns `true` when the byte completed a line.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        if is_terminator(byte) {
            return self.close_line();
        }
        if !is_printable(byte) {
            self.stats.dropped_bytes = self.stats.dropped_bytes.saturating_add(1);
            return false;
        }
        if self.current.push(byte).is_err() && !self.overflowed {
            // Keep the head of the line, ignore the rest until the terminator.
            self.overflowed = true;
            warn!("line exceeds {} bytes, truncating", LINE_MAX);
        }
        false
    }

    /// Feeds a slice of received bytes, returning how many lines completed.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|b| self.push_byte(**b)).count()
    }

    /// Takes the oldest completed line, if any.
    pub fn take_line(&mut self) -> Option<RawLine> {
        self.pending.pop_front()
    }

    /// Bytes of the line currently being assembled.
    pub fn partial_len(&self) -> usize {
        self.current.len()
    }

    /// Discards partial and completed lines. Statistics are kept.
    pub fn reset(&mut self) {
        self.current.clear();
        self.overflowed = false;
        self.pending.clear();
    }

    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    fn close_line(&mut self) -> bool {
        if self.overflowed {
            self.stats.truncated_lines = self.stats.truncated_lines.saturating_add(1);
            self.overflowed = false;
        }
        if self.current.is_empty() {
            // \r\n pairs and blank lines never produce a result
            return false;
        }

        let line = RawLine(core::mem::take(&mut self.current));
        trace!("line complete ({} bytes)", line.len());

        if self.pending.is_full() {
            self.pending.pop_front();
            self.stats.discarded_lines = self.stats.discarded_lines.saturating_add(1);
            warn!("framer backlog full, discarding oldest line");
        }
        // Cannot fail, a slot was freed above if needed.
        let _ = self.pending.push_back(line);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(framer: &mut LineFramer, data: &[u8]) {
        framer.push_bytes(data);
    }

    #[test]
    fn test_single_line() {
        let mut framer = LineFramer::new();
        feed(&mut framer, b"{\"result\":\"ON\"}\n");
        let line = framer.take_line().unwrap();
        assert_eq!(line.as_bytes(), b"{\"result\":\"ON\"}");
        assert!(framer.take_line().is_none());
    }

    #[test]
    fn test_partial_line_is_not_returned() {
        let mut framer = LineFramer::new();
        assert!(framer.take_line().is_none());
        feed(&mut framer, b"{\"status\":");
        assert!(framer.take_line().is_none());
        assert_eq!(framer.partial_len(), 10);
        feed(&mut framer, b"\"ok\"}\r");
        assert_eq!(framer.take_line().unwrap().as_str(), "{\"status\":\"ok\"}");
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let mut framer = LineFramer::new();
        feed(&mut framer, b"\r\n\n\r\r\nabc\r\n\r\n");
        assert_eq!(framer.take_line().unwrap().as_str(), "abc");
        assert!(framer.take_line().is_none());
    }

    #[test]
    fn test_non_printable_bytes_are_dropped() {
        let mut framer = LineFramer::new();
        feed(&mut framer, b"O\x00K\x07\x1b\xff\t\n");
        assert_eq!(framer.take_line().unwrap().as_str(), "OK");
        assert_eq!(framer.stats().dropped_bytes, 5);
    }

    #[test]
    fn test_line_only_noise_yields_nothing() {
        let mut framer = LineFramer::new();
        feed(&mut framer, b"\x00\x01\x02\n");
        assert!(framer.take_line().is_none());
    }

    #[test]
    fn test_overlong_line_is_truncated_and_still_terminated() {
        let mut framer = LineFramer::new();
        for _ in 0..(LINE_MAX + 500) {
            framer.push_byte(b'a');
        }
        assert_eq!(framer.partial_len(), LINE_MAX);
        assert!(framer.push_byte(b'\n'));
        let line = framer.take_line().unwrap();
        assert_eq!(line.len(), LINE_MAX);
        assert_eq!(framer.stats().truncated_lines, 1);

        // The next line starts clean.
        feed(&mut framer, b"next\n");
        assert_eq!(framer.take_line().unwrap().as_str(), "next");
        assert_eq!(framer.stats().truncated_lines, 1);
    }

    #[test]
    fn test_backlog_discards_oldest() {
        let mut framer = LineFramer::new();
        for i in 0..(PENDING_LINES + 1) {
            let line = [b'0' + i as u8, b'\n'];
            feed(&mut framer, &line);
        }
        assert_eq!(framer.stats().discarded_lines, 1);
        assert_eq!(framer.take_line().unwrap().as_str(), "1");
    }

    #[test]
    fn test_reset_clears_lines() {
        let mut framer = LineFramer::new();
        feed(&mut framer, b"ready\npart");
        framer.reset();
        assert!(framer.take_line().is_none());
        assert_eq!(framer.partial_len(), 0);
    }

    #[test]
    fn test_raw_line_try_from() {
        assert!(RawLine::try_from(&b"ok"[..]).is_ok());
        assert!(RawLine::try_from(&b""[..]).is_err());
        assert!(RawLine::try_from(&b"a\nb"[..]).is_err());
    }

    proptest! {
        #[test]
        fn prop_printable_content_survives(
            content in proptest::collection::vec(32u8..=126, 1..=LINE_MAX),
            noise in proptest::collection::vec(
                prop_oneof![0u8..=8, 11u8..=12, 14u8..=31, 127u8..=255],
                0..64,
            ),
        ) {
            let mut framer = LineFramer::new();
            // Interleave noise bytes between the content bytes.
            let mut noise_iter = noise.iter();
            for byte in &content {
                if let Some(n) = noise_iter.next() {
                    framer.push_byte(*n);
                }
                framer.push_byte(*byte);
            }
            framer.push_byte(b'\n');
            let line = framer.take_line().unwrap();
            prop_assert_eq!(line.as_bytes(), &content[..]);
            prop_assert!(framer.take_line().is_none());
        }

        #[test]
        fn prop_never_emits_empty_line(input in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let mut framer = LineFramer::new();
            framer.push_bytes(&input);
            while let Some(line) = framer.take_line() {
                prop_assert!(!line.is_empty());
                prop_assert!(line.len() <= LINE_MAX);
                prop_assert!(line.as_bytes().iter().all(|b| is_printable(*b)));
            }
        }
    }
}
