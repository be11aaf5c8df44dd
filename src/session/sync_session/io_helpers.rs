// src/session/sync_session/io_helpers.rs

use super::SyncSession;
use crate::common::{
    codec::WireMessage,
    error::SessionError,
    framer::{RawLine, LINE_MAX, PENDING_LINES},
    hal_traits::{ByteChannel, Clock, Transport},
};
use log::{debug, trace};
use nb::Result as NbResult;

// Bytes moved from the channel into the framer per poll.
const PUMP_BUDGET: usize = 256;

// Upper bound on stale bytes discarded before a request.
const DRAIN_BUDGET: usize = LINE_MAX * PENDING_LINES;

impl<'s, T, C> SyncSession<'s, T, C>
where
    T: Transport,
    C: Clock,
{
    /// Writes one encoded message to the open channel.
    pub(super) fn send_message(&mut self, msg: &WireMessage) -> Result<(), SessionError<T::Error>> {
        let channel = self.channel.as_mut().ok_or(SessionError::NotConnected)?;
        debug!("tx {}", msg.as_str());
        channel.send(msg.as_bytes()).map_err(SessionError::SendFailed)
    }

    /// Moves received bytes into the framer until a line completes or the
    /// channel runs dry.
    pub(super) fn pump(&mut self) -> NbResult<RawLine, SessionError<T::Error>> {
        if let Some(line) = self.framer.take_line() {
            return Ok(line);
        }
        let channel = self
            .channel
            .as_mut()
            .ok_or(nb::Error::Other(SessionError::NotConnected))?;

        for _ in 0..PUMP_BUDGET {
            match channel.try_recv() {
                Ok(byte) => {
                    if self.framer.push_byte(byte) {
                        break;
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(nb::Error::Other(SessionError::ReceiveFailed(e))),
            }
        }

        match self.framer.take_line() {
            Some(line) => {
                trace!("rx {}", line);
                Ok(line)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }

    /// One wait step for a reply line.
    ///
    /// Pumps the channel, then honours a disconnect raised meanwhile (possibly
    /// from inside `try_recv`), then checks `deadline`. The channel is released
    /// here, never inside the receive call.
    pub(super) fn poll_line(&mut self, deadline: C::Instant) -> NbResult<RawLine, SessionError<T::Error>> {
        let pumped = self.pump();

        if self.signal.take() {
            debug!("disconnect requested while waiting");
            self.teardown();
            return Err(nb::Error::Other(SessionError::Cancelled));
        }

        match pumped {
            Ok(line) => Ok(line),
            Err(nb::Error::WouldBlock) if self.clock.now() >= deadline => {
                Err(nb::Error::Other(SessionError::Timeout))
            }
            Err(e) => Err(e),
        }
    }

    /// Blocks on [`poll_line`](Self::poll_line), sleeping between polls.
    pub(super) fn wait_line(&mut self, deadline: C::Instant) -> Result<RawLine, SessionError<T::Error>> {
        let poll_ms = self.config.poll_interval_ms();
        loop {
            match self.poll_line(deadline) {
                Ok(line) => return Ok(line),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => self.clock.delay_ms(poll_ms),
            }
        }
    }

    /// Discards whatever arrived before the next request, such as the host's
    /// `ready` banner or a reply that came in after its timeout.
    pub(super) fn drain_stale_input(&mut self) -> Result<(), SessionError<T::Error>> {
        let channel = self.channel.as_mut().ok_or(SessionError::NotConnected)?;
        let mut drained = 0usize;
        while drained < DRAIN_BUDGET {
            match channel.try_recv() {
                Ok(byte) => {
                    self.framer.push_byte(byte);
                    drained += 1;
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(SessionError::ReceiveFailed(e)),
            }
        }
        while let Some(line) = self.framer.take_line() {
            debug!("discarding stale line: {}", line);
        }
        if drained > 0 {
            trace!("drained {} stale bytes", drained);
        }
        self.framer.reset();
        Ok(())
    }
}
