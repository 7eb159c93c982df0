//! Bounded blocking FIFO connecting two pipeline stages.
//!
//! Thin wrappers over `crossbeam_channel::bounded` that translate the only
//! two failure modes into contract-violation errors: every stage consumes
//! and produces a fixed, precomputed number of samples, so a disconnected
//! peer always means the neighbouring stage died early. Ordering is FIFO,
//! producers block on a full queue, consumers on an empty one, and nothing
//! is dropped or duplicated.

use crossbeam_channel::{Receiver, Sender};

/// Producer half of a stage channel.
pub struct StreamSender<T>(Sender<T>);

/// Consumer half of a stage channel.
pub struct StreamReceiver<T>(Receiver<T>);

/// Create a bounded stage channel. Capacity is clamped to at least one
/// sample so the linear chain can always make progress.
pub fn bounded<T>(capacity: usize) -> (StreamSender<T>, StreamReceiver<T>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (StreamSender(tx), StreamReceiver(rx))
}

impl<T> StreamSender<T> {
    /// Append a sample, blocking while the channel is full.
    pub fn send(&self, value: T) -> Result<(), String> {
        self.0
            .send(value)
            .map_err(|_| "Stage channel closed before its contracted sample count".to_string())
    }
}

impl<T> Clone for StreamSender<T> {
    fn clone(&self) -> Self {
        StreamSender(self.0.clone())
    }
}

impl<T> StreamReceiver<T> {
    /// Remove and return the head sample, blocking while the channel is empty.
    pub fn recv(&self) -> Result<T, String> {
        self.0
            .recv()
            .map_err(|_| "Stage channel drained past its contracted sample count".to_string())
    }
}
