// src/common/error.rs

use core::fmt::Debug;

use super::response::DisplayText;

/// Why a transport could not be opened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpenError<E = ()>
where
    E: Debug,
{
    /// The hardware resource is already claimed by someone else.
    #[error("transport already in use")]
    InUse,

    /// The resource was free but could not be initialised.
    #[error("transport initialisation failed: {0:?}")]
    Init(E),
}

/// Errors returned by the session. None of them are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<E = ()>
where
    E: Debug,
{
    /// The transport could not be claimed or initialised during `connect()`.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(OpenError<E>),

    /// A write to the transport did not complete.
    #[error("send failed: {0:?}")]
    SendFailed(E),

    /// The transport reported an error while receiving.
    #[error("receive failed: {0:?}")]
    ReceiveFailed(E),

    /// No complete line arrived within the operation's budget.
    #[error("no response")]
    Timeout,

    /// A request is already in flight.
    #[error("a request is already in flight")]
    Busy,

    /// The wait was ended by a disconnect request.
    #[error("request cancelled")]
    Cancelled,

    /// The operation needs a connected session.
    #[error("not connected")]
    NotConnected,

    /// `poll_response()` was called with no request in flight.
    #[error("no request in flight")]
    Idle,

    /// The host answered the probe, but not with an acknowledgement.
    #[error("probe rejected: {0}")]
    ProbeRejected(DisplayText),
}

impl<E: Debug> SessionError<E> {
    /// Timeouts are an expected outcome when the host is slow.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout)
    }

    /// Transport level failures, as opposed to protocol outcomes.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SessionError::ResourceUnavailable(_)
                | SessionError::SendFailed(_)
                | SessionError::ReceiveFailed(_)
        )
    }
}

impl<E: Debug> From<OpenError<E>> for SessionError<E> {
    fn from(e: OpenError<E>) -> Self {
        SessionError::ResourceUnavailable(e)
    }
}

/// Invalid input while constructing an [`Action`](super::action::Action).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("input {0} out of range (1-4)")]
    InputOutOfRange(u8),

    #[error("custom command is {len} bytes, limit is 50")]
    CustomTooLong { len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockIoError;

    #[test]
    fn test_error_classification() {
        assert!(SessionError::<MockIoError>::Timeout.is_timeout());
        assert!(!SessionError::<MockIoError>::Busy.is_timeout());
        assert!(SessionError::SendFailed(MockIoError).is_transport());
        assert!(SessionError::<MockIoError>::from(OpenError::InUse).is_transport());
        assert!(!SessionError::<MockIoError>::Cancelled.is_transport());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(SessionError::<()>::Timeout.to_string(), "no response");
        assert_eq!(
            SessionError::<()>::ResourceUnavailable(OpenError::InUse).to_string(),
            "resource unavailable: transport already in use"
        );
        assert_eq!(
            ActionError::CustomTooLong { len: 60 }.to_string(),
            "custom command is 60 bytes, limit is 50"
        );
    }
}
