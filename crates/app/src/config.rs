//! Engine configuration: device seeds, scenes, log seed and retention.
//!
//! Everything is static data handed to the engine at construction. Every
//! field has a default reproducing the demo panel, so an empty TOML table is
//! a valid configuration.

use std::num::NonZeroUsize;

use serde::Deserialize;

use homepanel_domain::action_log::Actor;
use homepanel_domain::device::{Device, DeviceKind, DeviceValue, Discrete, NumericRange};
use homepanel_domain::error::{PanelError, ValidationError};
use homepanel_domain::scene::Scene;
use homepanel_domain::time::Timestamp;

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identity stamped on entries written by engine operations.
    pub actor: Actor,
    /// Action log settings.
    pub log: LogConfig,
    /// Devices registered at startup, in listing order.
    pub devices: Vec<DeviceSeed>,
    /// Scenes available to `activate_scene`.
    pub scenes: Vec<Scene>,
    /// Entries recorded at startup, oldest first.
    pub log_seed: Vec<LogSeed>,
}

/// Action log settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum number of retained entries. `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl LogConfig {
    /// The retention bound as a non-zero count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroRetention`] when `max_entries` is `0`.
    pub fn retention(&self) -> Result<Option<NonZeroUsize>, ValidationError> {
        match self.max_entries {
            None => Ok(None),
            Some(n) => NonZeroUsize::new(n)
                .map(Some)
                .ok_or(ValidationError::ZeroRetention),
        }
    }
}

/// Static description of one device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSeed {
    pub id: String,
    pub kind: DeviceKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub initial: DeviceValue,
    /// Overrides the kind's default numeric domain.
    #[serde(default)]
    pub range: Option<NumericRange>,
}

impl DeviceSeed {
    fn new(
        id: &str,
        kind: DeviceKind,
        name: &str,
        description: &str,
        initial: impl Into<DeviceValue>,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            name: Some(name.to_string()),
            description: description.to_string(),
            initial: initial.into(),
            range: None,
        }
    }

    /// Build and validate the device this seed describes.
    ///
    /// # Errors
    ///
    /// Propagates the [`Device`] builder's validation and domain errors.
    pub fn build(&self) -> Result<Device, PanelError> {
        let mut builder = Device::builder()
            .id(self.id.clone())
            .kind(self.kind)
            .description(self.description.clone())
            .initial(self.initial);
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(range) = self.range {
            builder = builder.range(range);
        }
        builder.build()
    }
}

/// A log entry recorded at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSeed {
    /// Device id, or `SCENE`.
    pub device: String,
    pub action: String,
    /// Defaults to the engine actor.
    #[serde(default)]
    pub actor: Option<Actor>,
    /// Defaults to the clock's time at construction.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl LogSeed {
    fn new(device: &str, action: &str) -> Self {
        Self {
            device: device.to_string(),
            action: action.to_string(),
            actor: None,
            timestamp: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actor: Actor::default(),
            log: LogConfig::default(),
            devices: vec![
                DeviceSeed::new(
                    "light1",
                    DeviceKind::Light,
                    "Living Room Light",
                    "Tap to switch the light.",
                    Discrete::Off,
                ),
                DeviceSeed::new(
                    "door1",
                    DeviceKind::Lock,
                    "Front Door",
                    "Tap to lock / unlock the door.",
                    Discrete::Locked,
                ),
                DeviceSeed::new(
                    "thermostat1",
                    DeviceKind::Thermostat,
                    "Thermostat",
                    "Use slider to change temperature.",
                    22.0,
                ),
                DeviceSeed::new(
                    "fan1",
                    DeviceKind::Fan,
                    "Ceiling Fan",
                    "0 = OFF, 3 = MAX",
                    0.0,
                ),
            ],
            scenes: Scene::builtin(),
            log_seed: vec![
                LogSeed::new("light1", "Turn ON"),
                LogSeed::new("light1", "Turn OFF"),
                LogSeed::new("light1", "Turn ON"),
            ],
        }
    }
}
