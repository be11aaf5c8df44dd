// src/session/mod.rs

pub mod config;
pub mod history;
pub mod signal;
pub mod sync_session;

pub use config::SessionConfig;
pub use history::{CommandHistory, ExchangeStatus, HistoryEntry};
pub use signal::SessionSignal;
pub use sync_session::SyncSession;

/// Connection lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No channel is open. Initial state.
    #[default]
    Disconnected,
    /// A channel is open and the probe has been sent, awaiting the reply.
    Probing,
    /// The host acknowledged the probe; requests may be submitted.
    Connected,
    /// Exactly one request is in flight.
    Busy,
}
