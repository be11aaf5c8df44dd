// src/common/rx_queue.rs

//! Receive-side buffering between a UART interrupt and the session.
//!
//! The interrupt handler owns an [`RxProducer`] and pushes every received byte;
//! it never blocks and never allocates. When the queue is full the byte is
//! dropped and counted. The session side reads through an [`RxConsumer`],
//! usually wrapped together with a transmitter in a [`SplitChannel`].

use core::convert::Infallible;
use core::sync::atomic::{AtomicU32, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};
use log::warn;

use super::hal_traits::{ByteChannel, UartTx};

/// Fixed-size single-producer/single-consumer byte queue.
///
/// Holds up to `N - 1` bytes.
pub struct RxQueue<const N: usize> {
    queue: Queue<u8, N>,
    overruns: AtomicU32,
}

impl<const N: usize> Default for RxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxQueue<N> {
    pub const fn new() -> Self {
        RxQueue {
            queue: Queue::new(),
            overruns: AtomicU32::new(0),
        }
    }

    /// Splits the queue into its interrupt-side and task-side halves.
    pub fn split(&mut self) -> (RxProducer<'_, N>, RxConsumer<'_, N>) {
        let overruns = &self.overruns;
        let (producer, consumer) = self.queue.split();
        (
            RxProducer {
                inner: producer,
                overruns,
            },
            RxConsumer {
                inner: consumer,
                overruns,
            },
        )
    }
}

/// Interrupt-side half of an [`RxQueue`].
pub struct RxProducer<'q, const N: usize> {
    inner: Producer<'q, u8, N>,
    overruns: &'q AtomicU32,
}

impl<'q, const N: usize> RxProducer<'q, N> {
    /// Queues one received byte. Returns `false` if the queue was full and the
    /// byte was dropped.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.inner.enqueue(byte).is_ok() {
            true
        } else {
            self.overruns.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

/// Task-side half of an [`RxQueue`].
pub struct RxConsumer<'q, const N: usize> {
    inner: Consumer<'q, u8, N>,
    overruns: &'q AtomicU32,
}

impl<'q, const N: usize> RxConsumer<'q, N> {
    #[inline]
    pub fn try_recv(&mut self) -> nb::Result<u8, Infallible> {
        self.inner.dequeue().ok_or(nb::Error::WouldBlock)
    }

    /// Bytes currently waiting.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes dropped so far because the queue was full.
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

/// [`ByteChannel`] made of a blocking transmitter and an [`RxConsumer`].
pub struct SplitChannel<'q, TX, const N: usize> {
    tx: TX,
    rx: RxConsumer<'q, N>,
    reported_overruns: u32,
}

impl<'q, TX, const N: usize> SplitChannel<'q, TX, N>
where
    TX: UartTx,
{
    pub fn new(tx: TX, rx: RxConsumer<'q, N>) -> Self {
        let reported_overruns = rx.overruns();
        SplitChannel {
            tx,
            rx,
            reported_overruns,
        }
    }

    pub fn into_parts(self) -> (TX, RxConsumer<'q, N>) {
        (self.tx, self.rx)
    }
}

impl<'q, TX, const N: usize> ByteChannel for SplitChannel<'q, TX, N>
where
    TX: UartTx,
{
    type Error = TX::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.tx.write_blocking(bytes)?;
        self.tx.flush()
    }

    fn try_recv(&mut self) -> nb::Result<u8, Self::Error> {
        let overruns = self.rx.overruns();
        if overruns != self.reported_overruns {
            warn!(
                "rx queue overrun, {} bytes dropped",
                overruns.wrapping_sub(self.reported_overruns)
            );
            self.reported_overruns = overruns;
        }
        self.rx.try_recv().map_err(|e| match e {
            nb::Error::WouldBlock => nb::Error::WouldBlock,
            nb::Error::Other(never) => match never {},
        })
    }
}
