//! Port definitions: traits the engine is generic over.
//!
//! Ports are the boundaries between the engine and the outside world. The
//! engine never holds references to presentation objects: it reads time
//! through a [`Clock`] and announces committed changes through a
//! [`ChangePublisher`].

pub mod change;
pub mod clock;

pub use change::{ChangePublisher, NoopPublisher, StateChange};
pub use clock::{Clock, SystemClock};
