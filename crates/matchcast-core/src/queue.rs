//! Bounded handoff from the network worker to the polling thread.
//!
//! Both ends are non-blocking. A full queue refuses the newest item rather
//! than waiting: the scene should follow the latest updates, and the worker
//! must keep reading the socket so it can notice a stop request.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError, bounded};

use crate::error::EnqueueError;

/// Capacity used by the switcher.
pub const DEFAULT_CAPACITY: usize = 32;

/// Create a handoff queue holding at most `capacity` items.
pub fn handoff<T>(capacity: usize) -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (tx, rx) = bounded(capacity);
    (HandoffSender { tx }, HandoffReceiver { rx })
}

/// Producer half. Cloned once per worker; only one worker is alive at a time.
#[derive(Debug)]
pub struct HandoffSender<T> {
    tx: Sender<T>,
}

impl<T> HandoffSender<T> {
    /// Enqueue without blocking. On error the item has been dropped.
    pub fn try_enqueue(&self, item: T) -> Result<(), EnqueueError> {
        self.tx.try_send(item).map_err(|err| match err {
            TrySendError::Full(_) => EnqueueError::Full,
            TrySendError::Disconnected(_) => EnqueueError::Closed,
        })
    }
}

impl<T> Clone for HandoffSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

/// Consumer half, owned by the polling thread.
#[derive(Debug)]
pub struct HandoffReceiver<T> {
    rx: Receiver<T>,
}

impl<T> HandoffReceiver<T> {
    /// Dequeue the oldest item without blocking.
    pub fn try_dequeue(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of queued items.
    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(usize::MAX)
    }
}
