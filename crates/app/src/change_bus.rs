//! In-process change bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use crate::ports::{ChangePublisher, StateChange};

/// In-process change bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the change is simply dropped). Subscribers that fall more than
/// `capacity` changes behind observe a lag and should re-read snapshots.
#[derive(Debug, Clone)]
pub struct InProcessChangeBus {
    sender: broadcast::Sender<StateChange>,
}

impl InProcessChangeBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to changes on this bus.
    ///
    /// Returns a receiver that will get all changes published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangePublisher for InProcessChangeBus {
    fn publish(&self, change: StateChange) {
        // send fails only when there are zero receivers.
        if self.sender.send(change).is_err() {
            tracing::trace!("no change subscribers, dropping change");
        }
    }
}
