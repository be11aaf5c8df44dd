// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod action;
pub mod codec;
pub mod error;
pub mod framer;
pub mod hal_traits;
pub mod response;
pub mod rx_queue;
pub mod timing;
pub mod vendor;

// --- Re-export key types/traits/functions for easier access ---

// From action.rs
pub use action::{Action, CommandKey, CustomText, InputIndex};

// From codec.rs
pub use codec::{display_code, encode, WireMessage};

// From error.rs
pub use error::{ActionError, OpenError, SessionError};

// From framer.rs
pub use framer::{FramerStats, LineFramer, RawLine};

// From hal_traits.rs
pub use hal_traits::{ByteChannel, Clock, ClockInstant, MillisInstant, Transport, UartTx};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{classify, extract, is_probe_ack, DisplayText, Outcome, Reply};

// From rx_queue.rs
pub use rx_queue::{RxConsumer, RxProducer, RxQueue, SplitChannel};

// From vendor.rs
pub use vendor::{CommandEntry, Vendor, VendorProfile};

// From timing.rs (constants - users can access via common::timing::*)

// --- Feature-gated re-exports ---

#[cfg(feature = "std")]
pub use hal_traits::StdClock;

#[cfg(feature = "impl-native")]
pub use hal_traits::HalClock;
