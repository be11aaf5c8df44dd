// src/session/sync_session/mod.rs

mod io_helpers;
mod protocol_helpers;
mod transaction;

use super::{CommandHistory, SessionConfig, SessionSignal, SessionState};
use crate::common::{
    error::SessionError,
    framer::{FramerStats, LineFramer},
    hal_traits::{Clock, Transport},
    vendor::Vendor,
};
use log::{debug, info, warn};

/// Bookkeeping for the one request in flight.
#[derive(Debug, Clone, Copy)]
struct PendingRequest<I> {
    label: &'static str,
    command: &'static str,
    deadline: I,
}

/// Connection to the companion host, driven from a single task.
///
/// The session owns the channel while connected and drops it on disconnect,
/// which is the only place it is closed. Requests from other contexts go
/// through the shared [`SessionSignal`].
pub struct SyncSession<'s, T, C>
where
    T: Transport,
    C: Clock,
{
    transport: T,
    clock: C,
    channel: Option<T::Channel>,
    framer: LineFramer,
    state: SessionState,
    config: SessionConfig,
    signal: &'s SessionSignal,
    history: CommandHistory,
    pending: Option<PendingRequest<C::Instant>>,
    // A request was aborted by a disconnect and its caller has not been told.
    cancelled: bool,
}

impl<'s, T, C> SyncSession<'s, T, C>
where
    T: Transport,
    C: Clock,
{
    pub fn new(transport: T, clock: C, signal: &'s SessionSignal, config: SessionConfig) -> Self {
        SyncSession {
            transport,
            clock,
            channel: None,
            framer: LineFramer::new(),
            state: SessionState::Disconnected,
            config,
            signal,
            history: CommandHistory::new(),
            pending: None,
            cancelled: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected | SessionState::Busy)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn vendor(&self) -> Vendor {
        self.config.vendor
    }

    /// Switches the command table used for subsequent requests.
    pub fn set_vendor(&mut self, vendor: Vendor) {
        if vendor != self.config.vendor {
            debug!("vendor set to {}", vendor);
            self.config.vendor = vendor;
        }
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn framer_stats(&self) -> FramerStats {
        self.framer.stats()
    }

    /// Opens the channel and runs the probe handshake.
    ///
    /// Does nothing if already connected. On any failure the channel is
    /// released and the session is back in `Disconnected`.
    pub fn connect(&mut self) -> Result<(), SessionError<T::Error>> {
        self.service();
        match self.state {
            SessionState::Connected => return Ok(()),
            SessionState::Busy | SessionState::Probing => return Err(SessionError::Busy),
            SessionState::Disconnected => {}
        }

        self.state = SessionState::Probing;
        info!("opening channel");
        let channel = match self.transport.open() {
            Ok(channel) => channel,
            Err(e) => {
                warn!("open failed: {}", e);
                self.state = SessionState::Disconnected;
                return Err(e.into());
            }
        };
        self.channel = Some(channel);
        self.framer.reset();
        self.cancelled = false;

        // A reply to a request cancelled before the reopen may still be queued.
        match self.drain_stale_input().and_then(|()| self.run_probe()) {
            Ok(()) => {
                self.state = SessionState::Connected;
                info!("connected ({} profile)", self.config.vendor);
                Ok(())
            }
            Err(e) => {
                warn!("probe failed: {}", e);
                self.teardown();
                Err(e)
            }
        }
    }

    /// Releases the channel now. Valid in any state, repeated calls are no-ops.
    ///
    /// Only callable by the owner. Callbacks and interrupt handlers use
    /// [`SessionSignal::request_disconnect`] instead.
    pub fn disconnect(&mut self) {
        self.signal.take();
        self.teardown();
    }

    /// Scheduling step: performs a disconnect requested through the signal.
    ///
    /// Returns `true` if a teardown happened. Call from the owning task's loop;
    /// every public operation also calls it on entry.
    pub fn service(&mut self) -> bool {
        if !self.signal.take() {
            return false;
        }
        debug!("processing deferred disconnect");
        self.teardown();
        true
    }

    /// Closes the channel and hands back the transport and clock.
    pub fn release(mut self) -> (T, C) {
        self.teardown();
        (self.transport, self.clock)
    }
}
