// src/common/timing.rs

use core::time::Duration;

// === Link Parameters ===

/// Serial speed shared with the companion host (8N1).
pub const BAUD_RATE: u32 = 115_200;

// === Exchange Budgets ===

/// Time allowed for the host to answer the connect probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Time allowed for the host to answer any other command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(5000);

/// Sleep between receive polls while waiting for a line.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);
