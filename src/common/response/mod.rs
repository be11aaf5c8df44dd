// src/common/response/mod.rs

//! Turning reply lines into something the shell can show.
//!
//! The host's payload format is not guaranteed, so nothing here fails: a
//! structured `result` field wins, otherwise a coarse success/failure verdict
//! is derived from the raw text.

pub mod parse;

pub use parse::{classify, extract, field, is_probe_ack};

/// Longest text handed back to the shell, in bytes.
pub const DISPLAY_TEXT_MAX: usize = 50;

/// Text shown to the user for one reply.
pub type DisplayText = heapless::String<DISPLAY_TEXT_MAX>;

/// Shown when the reply has no `result` field but mentions success.
pub const SUCCESS_TEXT: &str = "Command Sent";

/// Shown for anything else.
pub const FAILURE_TEXT: &str = "Command Failed";

/// How the display text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Taken verbatim from the `result` field.
    Result,
    /// No `result` field, but the reply mentions `success`.
    Success,
    /// Neither of the above.
    Failure,
}

/// A classified reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: DisplayText,
    pub outcome: Outcome,
}

/// Builds display text from raw bytes, stopping at [`DISPLAY_TEXT_MAX`].
///
/// Bytes outside printable ASCII are skipped.
pub fn display_text(bytes: &[u8]) -> DisplayText {
    let mut text = DisplayText::new();
    for &b in bytes.iter().filter(|b| b.is_ascii() && !b.is_ascii_control()) {
        if text.push(b as char).is_err() {
            break;
        }
    }
    text
}
