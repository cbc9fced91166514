//! Multi-producer multi-consumer delivery queues.

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

/// An unbounded MPMC FIFO used as one direction of the link.
///
/// Cloning the queue clones both channel handles, so any number of threads
/// can push and pop concurrently. Receiving with a zero timeout is a
/// non-blocking poll.
#[derive(Clone, Debug)]
pub struct DeliveryQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> DeliveryQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Enqueues an item.
    pub fn push(&self, item: T) {
        self.sender.send(item).expect("Receiver must exist.");
    }

    /// Removes the oldest item, waiting up to `timeout` for one to arrive.
    /// A zero timeout polls without blocking.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        if timeout.is_zero() {
            return self.try_recv();
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Removes the oldest item if one is immediately available.
    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Number of queued items (a snapshot, it may change immediately).
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the queue is currently empty (a snapshot).
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T> Default for DeliveryQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
