// src/session/signal.rs

use core::sync::atomic::{AtomicBool, Ordering};

/// Deferred disconnect request, shareable with interrupt and callback contexts.
///
/// Raising the signal never touches the channel. The owning session notices it
/// at its next scheduling step (`service()`, any public operation, or the next
/// iteration of a wait) and releases the channel there, outside any callback
/// the channel itself may be running.
///
/// ```
/// use cec_bridge::SessionSignal;
///
/// static DISCONNECT: SessionSignal = SessionSignal::new();
///
/// // e.g. from a menu exit callback
/// DISCONNECT.request_disconnect();
/// assert!(DISCONNECT.is_requested());
/// ```
#[derive(Debug, Default)]
pub struct SessionSignal {
    disconnect: AtomicBool,
}

impl SessionSignal {
    pub const fn new() -> Self {
        SessionSignal {
            disconnect: AtomicBool::new(false),
        }
    }

    /// Asks the session to disconnect at its next scheduling step.
    pub fn request_disconnect(&self) {
        self.disconnect.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.disconnect.load(Ordering::Acquire)
    }

    /// Consumes a pending request.
    pub(crate) fn take(&self) -> bool {
        self.disconnect.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_once() {
        let signal = SessionSignal::new();
        assert!(!signal.take());
        signal.request_disconnect();
        signal.request_disconnect();
        assert!(signal.is_requested());
        assert!(signal.take());
        assert!(!signal.take());
        assert!(!signal.is_requested());
    }
}
