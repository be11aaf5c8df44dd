// src/lib.rs

//! Serial command/response bridge between a handheld controller and a CEC
//! companion host.
//!
//! The controller sends one-line JSON envelopes such as
//! `{"command":"POWER_ON"}` and the host answers with one text line per
//! request. [`SyncSession`] owns the link, runs the probe handshake and keeps
//! exactly one request in flight; everything under [`common`] is the plain,
//! allocation-free protocol machinery it is built from.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod session;

#[cfg(feature = "native-serial")]
pub mod native;

// Re-export key types for convenience
pub use common::{Action, DisplayText, InputIndex, SessionError, Vendor, VendorProfile};
pub use session::{SessionConfig, SessionSignal, SessionState, SyncSession};
