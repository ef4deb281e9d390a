//! Common error types used across the workspace.
//!
//! Each failure has its own typed struct; [`PanelError`] is the umbrella
//! returned by every fallible operation and converts from each via `#[from]`.

use crate::device::DeviceKind;

/// Top-level error for registry and engine operations.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    #[error(transparent)]
    UnsupportedOperation(#[from] UnsupportedOperationError),

    #[error(transparent)]
    UnknownScene(#[from] UnknownSceneError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// An operation referenced a device id that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device {device_id} not found")]
pub struct NotFoundError {
    pub device_id: String,
}

/// A requested value lies outside the device's declared domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value {value} is outside the domain of {device_id} (expected {expected})")]
pub struct InvalidStateError {
    pub device_id: String,
    pub value: String,
    pub expected: String,
}

/// The operation is not defined for the device's kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} is not supported by {kind} device {device_id}")]
pub struct UnsupportedOperationError {
    pub operation: &'static str,
    pub device_id: String,
    pub kind: DeviceKind,
}

/// No scene is registered under the given name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scene {name} is not registered")]
pub struct UnknownSceneError {
    pub name: String,
}

/// Construction-time invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("device id {0} must not contain whitespace")]
    WhitespaceInDeviceId(String),

    #[error("device id {0} is reserved")]
    ReservedDeviceId(String),

    #[error("device {0} is registered more than once")]
    DuplicateDeviceId(String),

    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid range step {0}")]
    InvalidStep(f64),

    #[error("{kind} devices {expectation} a numeric range")]
    RangeMismatch {
        kind: DeviceKind,
        expectation: &'static str,
    },

    #[error("fan ranges must use whole-number bounds and steps within [0, 255]")]
    FanRangeOverflow,

    #[error("device {0} is missing a kind")]
    MissingKind(String),

    #[error("device {0} is missing an initial state")]
    MissingState(String),

    #[error("scene name must not be empty")]
    EmptySceneName,

    #[error("scene {0} is defined more than once")]
    DuplicateScene(String),

    #[error("action log retention must keep at least one entry")]
    ZeroRetention,
}
