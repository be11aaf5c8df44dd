// src/session/history.rs

//! Record of recent exchanges, newest last.

use heapless::Deque;

use crate::common::response::{display_text, DisplayText, Outcome};

/// Exchanges kept before the oldest is evicted.
pub const HISTORY_LEN: usize = 16;

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStatus {
    /// A reply line arrived and was classified.
    Answered(Outcome),
    Timeout,
    SendFailed,
    ReceiveFailed,
    Cancelled,
}

impl ExchangeStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExchangeStatus::Answered(Outcome::Result) | ExchangeStatus::Answered(Outcome::Success)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Action label, e.g. `Power ON`.
    pub label: &'static str,
    /// Wire command name, e.g. `POWER_ON`.
    pub command: &'static str,
    pub status: ExchangeStatus,
    /// Display text of the reply, empty unless answered.
    pub text: DisplayText,
}

/// Ring of the last [`HISTORY_LEN`] exchanges.
#[derive(Debug, Default)]
pub struct CommandHistory {
    entries: Deque<HistoryEntry, HISTORY_LEN>,
}

impl CommandHistory {
    pub const fn new() -> Self {
        CommandHistory {
            entries: Deque::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        label: &'static str,
        command: &'static str,
        status: ExchangeStatus,
        text: &str,
    ) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        let entry = HistoryEntry {
            label,
            command,
            status,
            text: display_text(text.as_bytes()),
        };
        // A slot is free, see above.
        let _ = self.entries.push_back(entry);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Exchanges that got a positive reply, oldest first.
    pub fn successful(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(|e| e.status.is_success())
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_keeps_newest() {
        let mut history = CommandHistory::new();
        for _ in 0..HISTORY_LEN {
            history.record("Mute", "MUTE", ExchangeStatus::Timeout, "");
        }
        history.record("Power ON", "POWER_ON", ExchangeStatus::Answered(Outcome::Result), "ON");
        assert_eq!(history.len(), HISTORY_LEN);
        let last = history.last().unwrap();
        assert_eq!(last.command, "POWER_ON");
        assert_eq!(last.text.as_str(), "ON");
    }

    #[test]
    fn test_successful_filter() {
        let mut history = CommandHistory::new();
        history.record("Power ON", "POWER_ON", ExchangeStatus::Answered(Outcome::Result), "ON");
        history.record("Scan Devices", "SCAN", ExchangeStatus::Answered(Outcome::Failure), "Command Failed");
        history.record("Mute", "MUTE", ExchangeStatus::SendFailed, "");
        history.record("Check Status", "STATUS", ExchangeStatus::Answered(Outcome::Success), "Command Sent");

        let labels: std::vec::Vec<_> = history.successful().map(|e| e.label).collect();
        assert_eq!(labels, ["Power ON", "Check Status"]);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.successful().count(), 0);
    }
}
