//! Scene: a named batch of device targets applied together.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceValue, Discrete};
use crate::error::ValidationError;
use crate::id::DeviceId;

/// One `(device, value)` pair of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTarget {
    pub device: DeviceId,
    pub value: DeviceValue,
}

/// A named, ordered list of targets. Targets are applied in listed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<SceneTarget>,
}

impl Scene {
    /// Create a scene with no targets yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
        }
    }

    /// Append a target.
    #[must_use]
    pub fn with_target(mut self, device: DeviceId, value: impl Into<DeviceValue>) -> Self {
        self.targets.push(SceneTarget {
            device,
            value: value.into(),
        });
        self
    }

    /// Check domain invariants that do not depend on the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySceneName`] when `name` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptySceneName);
        }
        Ok(())
    }

    /// The four built-in scenes over `light1`, `door1` and `fan1`.
    ///
    /// | Scene | light1 | door1 | fan1 |
    /// |-------|--------|-------|------|
    /// | Home  | on  | unlocked | unchanged |
    /// | Away  | off | locked   | unchanged |
    /// | Night | off | locked   | 1 |
    /// | Party | on  | unlocked | 2 |
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        let light = DeviceId::from_static("light1");
        let door = DeviceId::from_static("door1");
        let fan = DeviceId::from_static("fan1");

        vec![
            Self::new("Home")
                .with_target(light.clone(), Discrete::On)
                .with_target(door.clone(), Discrete::Unlocked),
            Self::new("Away")
                .with_target(light.clone(), Discrete::Off)
                .with_target(door.clone(), Discrete::Locked),
            Self::new("Night")
                .with_target(light.clone(), Discrete::Off)
                .with_target(door.clone(), Discrete::Locked)
                .with_target(fan.clone(), 1.0),
            Self::new("Party")
                .with_target(light, Discrete::On)
                .with_target(door, Discrete::Unlocked)
                .with_target(fan, 2.0),
        ]
    }
}
