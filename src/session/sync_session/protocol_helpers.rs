// src/session/sync_session/protocol_helpers.rs

use super::{PendingRequest, SyncSession};
use crate::common::{
    action::Action,
    codec::encode,
    error::SessionError,
    framer::RawLine,
    hal_traits::{Clock, Transport},
    response::{classify, extract, is_probe_ack, DisplayText},
};
use crate::session::{ExchangeStatus, SessionState};
use log::{debug, info, warn};

impl<'s, T, C> SyncSession<'s, T, C>
where
    T: Transport,
    C: Clock,
{
    /// Sends the probe on the freshly opened channel and checks the reply.
    pub(super) fn run_probe(&mut self) -> Result<(), SessionError<T::Error>> {
        let probe = encode(self.config.vendor.profile(), &Action::Probe);
        self.send_message(&probe)?;

        let deadline = self.clock.now() + self.config.probe_timeout;
        let line = self.wait_line(deadline)?;

        if is_probe_ack(&line) {
            debug!("probe acknowledged: {}", line);
            Ok(())
        } else {
            Err(SessionError::ProbeRejected(extract(&line)))
        }
    }

    /// Classifies the reply and returns the session to `Connected`.
    pub(super) fn complete_request(
        &mut self,
        pending: PendingRequest<C::Instant>,
        line: &RawLine,
    ) -> DisplayText {
        let reply = classify(line);
        debug!("{} -> {:?} \"{}\"", pending.command, reply.outcome, reply.text);

        self.pending = None;
        self.state = SessionState::Connected;
        self.history.record(
            pending.label,
            pending.command,
            ExchangeStatus::Answered(reply.outcome),
            &reply.text,
        );
        reply.text
    }

    /// Ends the request after a wait error and passes the error through.
    ///
    /// A timeout keeps the channel; a receive error releases it. A cancellation
    /// has already been torn down by the wait.
    pub(super) fn fail_request(
        &mut self,
        pending: PendingRequest<C::Instant>,
        error: SessionError<T::Error>,
    ) -> SessionError<T::Error> {
        match error {
            SessionError::Cancelled => {
                // Reported right here, poll_response must not repeat it.
                self.cancelled = false;
            }
            SessionError::Timeout => {
                warn!("{}: no response", pending.command);
                self.pending = None;
                self.framer.reset();
                self.state = SessionState::Connected;
                self.history
                    .record(pending.label, pending.command, ExchangeStatus::Timeout, "");
            }
            ref other => {
                warn!("{}: {}", pending.command, other);
                self.pending = None;
                self.history.record(
                    pending.label,
                    pending.command,
                    ExchangeStatus::ReceiveFailed,
                    "",
                );
                self.teardown();
            }
        }
        error
    }

    /// Drops the channel and returns to `Disconnected`. Safe to repeat.
    ///
    /// Must only run from the owning task, never from inside a channel call.
    pub(super) fn teardown(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.history
                .record(pending.label, pending.command, ExchangeStatus::Cancelled, "");
            self.cancelled = true;
        }
        if let Some(channel) = self.channel.take() {
            drop(channel);
            info!("channel closed");
        }
        self.framer.reset();
        self.state = SessionState::Disconnected;
    }
}
