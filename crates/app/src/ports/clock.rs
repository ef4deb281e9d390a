//! Clock port: where log timestamps come from.

use homepanel_domain::time::{Timestamp, now};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by [`homepanel_domain::time::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
