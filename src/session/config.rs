// src/session/config.rs

use core::time::Duration;

use crate::common::{timing, Vendor};

/// Tunables for a [`SyncSession`](super::SyncSession).
///
/// `Default` gives the values the companion host is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Command table used to encode actions.
    pub vendor: Vendor,
    /// Budget for the connect probe reply.
    pub probe_timeout: Duration,
    /// Budget for every other reply.
    pub command_timeout: Duration,
    /// Sleep between receive polls in the blocking calls.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            vendor: Vendor::Generic,
            probe_timeout: timing::PROBE_TIMEOUT,
            command_timeout: timing::COMMAND_TIMEOUT,
            poll_interval: timing::POLL_INTERVAL,
        }
    }
}

impl SessionConfig {
    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = vendor;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the poll sleep. Zero is raised to one millisecond so the blocking
    /// calls always let the clock move.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub(crate) fn poll_interval_ms(&self) -> u32 {
        u32::try_from(self.poll_interval.as_millis()).unwrap_or(u32::MAX).max(1)
    }
}
