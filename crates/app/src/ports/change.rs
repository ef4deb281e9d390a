//! Change port: notification of committed state transitions.

use homepanel_domain::action_log::ActionLogEntry;
use homepanel_domain::device::Device;

/// Everything one engine operation made visible, published after it commits.
///
/// A scene activation produces a single change carrying every affected
/// device and its one summary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    /// Snapshots of the devices touched, in application order.
    pub devices: Vec<Device>,
    /// The log entry written by the operation, if it logged.
    pub entry: Option<ActionLogEntry>,
}

/// Receives committed state changes.
pub trait ChangePublisher {
    /// Announce a change. Delivery is best effort and cannot fail the operation.
    fn publish(&self, change: StateChange);
}

/// Publisher that discards every change, for pull-only callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl ChangePublisher for NoopPublisher {
    fn publish(&self, _change: StateChange) {}
}

impl<T: ChangePublisher + ?Sized> ChangePublisher for std::sync::Arc<T> {
    fn publish(&self, change: StateChange) {
        (**self).publish(change);
    }
}
