//! Action log entry: an immutable record of a committed mutation.

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, LogEntryId, SCENE_SENTINEL};
use crate::time::Timestamp;

/// What a log entry is about: one device, or a whole scene activation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogTarget {
    Device(DeviceId),
    Scene,
}

impl LogTarget {
    /// The device this entry refers to, if any.
    #[must_use]
    pub fn device_id(&self) -> Option<&DeviceId> {
        match self {
            Self::Device(id) => Some(id),
            Self::Scene => None,
        }
    }
}

impl From<DeviceId> for LogTarget {
    fn from(id: DeviceId) -> Self {
        Self::Device(id)
    }
}

impl TryFrom<String> for LogTarget {
    type Error = crate::error::ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == SCENE_SENTINEL {
            Ok(Self::Scene)
        } else {
            DeviceId::new(value).map(Self::Device)
        }
    }
}

impl From<LogTarget> for String {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Device(id) => id.into(),
            LogTarget::Scene => SCENE_SENTINEL.to_string(),
        }
    }
}

impl std::fmt::Display for LogTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device(id) => id.fmt(f),
            Self::Scene => f.write_str(SCENE_SENTINEL),
        }
    }
}

/// Who performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self("User".to_string())
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry of the action log. Never edited once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: LogEntryId,
    pub timestamp: Timestamp,
    pub target: LogTarget,
    pub action: String,
    pub actor: Actor,
}

impl ActionLogEntry {
    /// Create a builder for constructing an [`ActionLogEntry`].
    #[must_use]
    pub fn builder() -> ActionLogEntryBuilder {
        ActionLogEntryBuilder::default()
    }

    /// Entry recording that a device was set to a new state.
    #[must_use]
    pub fn device_set(
        device_id: DeviceId,
        state: impl std::fmt::Display,
        actor: Actor,
        timestamp: Timestamp,
    ) -> Self {
        Self::builder()
            .target(device_id)
            .action(format!("Set to {state}"))
            .actor(actor)
            .timestamp(timestamp)
            .build()
    }

    /// Entry summarizing a scene activation.
    #[must_use]
    pub fn scene_activated(scene: &str, actor: Actor, timestamp: Timestamp) -> Self {
        Self::builder()
            .target(LogTarget::Scene)
            .action(format!("Activated {scene} Scene"))
            .actor(actor)
            .timestamp(timestamp)
            .build()
    }
}

/// Step-by-step builder for [`ActionLogEntry`].
#[derive(Debug, Default)]
pub struct ActionLogEntryBuilder {
    id: Option<LogEntryId>,
    timestamp: Option<Timestamp>,
    target: Option<LogTarget>,
    action: Option<String>,
    actor: Option<Actor>,
}

impl ActionLogEntryBuilder {
    #[must_use]
    pub fn id(mut self, id: LogEntryId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<LogTarget>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[must_use]
    pub fn actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Consume the builder and return an [`ActionLogEntry`].
    ///
    /// A missing target defaults to [`LogTarget::Scene`], a missing timestamp
    /// to the current time.
    #[must_use]
    pub fn build(self) -> ActionLogEntry {
        ActionLogEntry {
            id: self.id.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(crate::time::now),
            target: self.target.unwrap_or(LogTarget::Scene),
            action: self.action.unwrap_or_default(),
            actor: self.actor.unwrap_or_default(),
        }
    }
}
