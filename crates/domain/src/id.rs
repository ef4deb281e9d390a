//! Typed identifier newtypes.
//!
//! Device ids are human-chosen strings (`light1`, `door1`) that stay stable for
//! the process lifetime. Log entry ids are random UUIDs.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier written in place of a device id when an entry summarizes a scene.
pub const SCENE_SENTINEL: &str = "SCENE";

/// Unique identifier for a [`Device`](crate::device::Device).
///
/// Never empty, never contains whitespace and never equals [`SCENE_SENTINEL`]
/// in any letter case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate and wrap a device id.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the id is empty, contains whitespace
    /// or collides with the scene sentinel.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ValidationError::WhitespaceInDeviceId(id));
        }
        if id.eq_ignore_ascii_case(SCENE_SENTINEL) {
            return Err(ValidationError::ReservedDeviceId(id));
        }
        Ok(Self(id))
    }

    /// Wrap a compile-time id already known to satisfy the invariants.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(Self::new(id).is_ok(), "invalid static device id {id}");
        Self(id.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DeviceId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DeviceId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Unique identifier for an [`ActionLogEntry`](crate::action_log::ActionLogEntry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntryId(uuid::Uuid);

impl Default for LogEntryId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl LogEntryId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
