// src/session/sync_session/transaction.rs

use super::{PendingRequest, SyncSession};
use crate::common::{
    action::Action,
    codec::{command_name, encode},
    error::SessionError,
    hal_traits::{Clock, Transport},
    response::DisplayText,
};
use crate::session::{ExchangeStatus, SessionState};
use log::{debug, warn};

impl<'s, T, C> SyncSession<'s, T, C>
where
    T: Transport,
    C: Clock,
{
    /// Sends `action` and waits for the reply.
    ///
    /// Blocks for at most the configured command timeout. A slow host shows up
    /// as [`SessionError::Timeout`] and leaves the session `Connected`.
    pub fn submit(&mut self, action: &Action) -> Result<DisplayText, SessionError<T::Error>> {
        self.begin_request(action)?;
        let poll_ms = self.config.poll_interval_ms();
        loop {
            match self.poll_response() {
                Ok(text) => return Ok(text),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => self.clock.delay_ms(poll_ms),
            }
        }
    }

    /// Starts a request without waiting for its reply.
    ///
    /// The session stays `Busy` until [`poll_response`](Self::poll_response)
    /// yields something other than `WouldBlock`. Fails with
    /// [`SessionError::Busy`] if a request is already in flight, without
    /// touching the channel.
    pub fn begin_request(&mut self, action: &Action) -> Result<(), SessionError<T::Error>> {
        self.service();
        match self.state {
            SessionState::Connected => {}
            SessionState::Busy => return Err(SessionError::Busy),
            SessionState::Disconnected | SessionState::Probing => {
                return Err(SessionError::NotConnected)
            }
        }

        if let Err(e) = self.drain_stale_input() {
            warn!("receive failed while draining: {}", e);
            self.teardown();
            return Err(e);
        }

        let profile = self.config.vendor.profile();
        let msg = encode(profile, action);
        let command = command_name(profile, action);
        let label = action.label();

        self.cancelled = false;
        self.state = SessionState::Busy;
        if let Err(e) = self.send_message(&msg) {
            warn!("{}: {}", command, e);
            self.state = SessionState::Connected;
            self.history.record(label, command, ExchangeStatus::SendFailed, "");
            return Err(e);
        }

        debug!("{} in flight", command);
        let deadline = self.clock.now() + self.config.command_timeout;
        self.pending = Some(PendingRequest {
            label,
            command,
            deadline,
        });
        Ok(())
    }

    /// Polls for the reply to the request started by
    /// [`begin_request`](Self::begin_request).
    ///
    /// Returns `WouldBlock` while waiting, [`SessionError::Timeout`] once the
    /// deadline passes, and [`SessionError::Cancelled`] once if the request
    /// was ended by a disconnect. Never blocks.
    pub fn poll_response(&mut self) -> nb::Result<DisplayText, SessionError<T::Error>> {
        self.service();

        let Some(pending) = self.pending else {
            let err = if core::mem::take(&mut self.cancelled) {
                SessionError::Cancelled
            } else if self.state == SessionState::Connected {
                SessionError::Idle
            } else {
                SessionError::NotConnected
            };
            return Err(nb::Error::Other(err));
        };

        match self.poll_line(pending.deadline) {
            Ok(line) => Ok(self.complete_request(pending, &line)),
            Err(nb::Error::WouldBlock) => Err(nb::Error::WouldBlock),
            Err(nb::Error::Other(e)) => Err(nb::Error::Other(self.fail_request(pending, e))),
        }
    }
}
