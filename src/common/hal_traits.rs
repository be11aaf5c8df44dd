// src/common/hal_traits.rs

use super::error::OpenError;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Point in time as seen by a [`Clock`].
///
/// Only ordering and differences matter; the epoch is up to the implementation.
pub trait ClockInstant: Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> ClockInstant for T where T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration> {}

/// Monotonic time source plus a way to sleep.
pub trait Clock {
    type Instant: ClockInstant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// An open, exclusively owned byte stream to the companion host.
///
/// Dropping the channel closes it and releases the underlying resource.
pub trait ByteChannel {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Writes all of `bytes`, blocking until they are handed to the hardware.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Attempts to read a single received byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if nothing has arrived yet. Must
    /// never block.
    fn try_recv(&mut self) -> nb::Result<u8, Self::Error>;
}

/// Something that can hand out a [`ByteChannel`].
///
/// A transport is opened once per connection. Opening while a previous channel
/// is still alive must fail with [`OpenError::InUse`].
pub trait Transport {
    type Error: Debug;
    type Channel: ByteChannel<Error = Self::Error>;

    fn open(&mut self) -> Result<Self::Channel, OpenError<Self::Error>>;
}

/// Blocking UART transmitter, the outbound half of a [`ByteChannel`].
pub trait UartTx {
    type Error: Debug;

    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Millisecond timestamp, for clocks built on a plain tick counter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MillisInstant(pub u64);

impl Add<Duration> for MillisInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MillisInstant(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl Sub<MillisInstant> for MillisInstant {
    type Output = Duration;
    fn sub(self, rhs: MillisInstant) -> Duration {
        Duration::from_millis(self.0.saturating_sub(rhs.0))
    }
}

/// [`Clock`] over an `embedded-hal` delay and a monotonic millisecond counter.
///
/// Typical use on a microcontroller: the HAL's timer delay plus a closure
/// reading the system tick.
#[cfg(feature = "impl-native")]
pub struct HalClock<D, F> {
    delay: D,
    millis: F,
}

#[cfg(feature = "impl-native")]
impl<D, F> HalClock<D, F>
where
    D: embedded_hal::delay::DelayNs,
    F: Fn() -> u64,
{
    pub fn new(delay: D, millis: F) -> Self {
        HalClock { delay, millis }
    }

    pub fn release(self) -> D {
        self.delay
    }
}

#[cfg(feature = "impl-native")]
impl<D, F> Clock for HalClock<D, F>
where
    D: embedded_hal::delay::DelayNs,
    F: Fn() -> u64,
{
    type Instant = MillisInstant;

    fn now(&self) -> MillisInstant {
        MillisInstant((self.millis)())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// [`Clock`] backed by `std::time::Instant` and `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

#[cfg(feature = "std")]
impl Clock for StdClock {
    type Instant = std::time::Instant;

    fn now(&self) -> std::time::Instant {
        std::time::Instant::now()
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
