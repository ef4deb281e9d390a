//! Automation engine: toggle, value assignment and scene activation.
//!
//! The engine owns the [`DeviceRegistry`] and the [`ActionLog`]. Every
//! operation validates first and mutates second, so a failed call leaves both
//! stores exactly as they were. Operations run to completion before
//! returning; callers sharing one engine across threads must wrap it in a
//! mutex so a scene's registry writes and its log entry move together.

use homepanel_domain::action_log::{ActionLogEntry, Actor, LogTarget};
use homepanel_domain::device::{Device, DeviceValue};
use homepanel_domain::error::{
    NotFoundError, PanelError, UnknownSceneError, UnsupportedOperationError, ValidationError,
};
use homepanel_domain::scene::Scene;

use crate::action_log::{ActionLog, LogFilter, LogQuery};
use crate::config::EngineConfig;
use crate::ports::{ChangePublisher, Clock, NoopPublisher, StateChange, SystemClock};
use crate::registry::DeviceRegistry;

/// Options for [`AutomationEngine::set_value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Append a `Set to <value>` entry to the action log.
    pub log: bool,
}

impl SetOptions {
    /// Transient change, not logged (e.g. a slider drag).
    #[must_use]
    pub fn transient() -> Self {
        Self { log: false }
    }

    /// Logged change.
    #[must_use]
    pub fn logged() -> Self {
        Self { log: true }
    }
}

/// Device state and automation engine.
pub struct AutomationEngine<P = NoopPublisher, C = SystemClock> {
    registry: DeviceRegistry,
    log: ActionLog,
    scenes: Vec<Scene>,
    actor: Actor,
    publisher: P,
    clock: C,
}

impl AutomationEngine {
    /// Build a pull-only engine using the system clock.
    ///
    /// # Errors
    ///
    /// See [`AutomationEngine::with_ports`].
    pub fn from_config(config: &EngineConfig) -> Result<Self, PanelError> {
        Self::with_ports(config, NoopPublisher, SystemClock)
    }
}

impl<P, C> AutomationEngine<P, C>
where
    P: ChangePublisher,
    C: Clock,
{
    /// Build an engine from static configuration.
    ///
    /// Devices are registered in listing order, scenes are checked against
    /// the registry, and the log seed is recorded oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Validation`] for malformed seeds, duplicate
    /// ids or scene names and zero retention; [`PanelError::NotFound`] or
    /// [`PanelError::InvalidState`] when a scene targets an unknown device or
    /// an out-of-domain value.
    pub fn with_ports(config: &EngineConfig, publisher: P, clock: C) -> Result<Self, PanelError> {
        let devices = config
            .devices
            .iter()
            .map(crate::config::DeviceSeed::build)
            .collect::<Result<Vec<_>, _>>()?;
        let registry = DeviceRegistry::new(devices)?;

        let mut scenes: Vec<Scene> = Vec::with_capacity(config.scenes.len());
        for scene in &config.scenes {
            scene.validate()?;
            if scenes.iter().any(|s| s.name == scene.name) {
                return Err(ValidationError::DuplicateScene(scene.name.clone()).into());
            }
            for target in &scene.targets {
                registry.check(target.device.as_str(), target.value)?;
            }
            scenes.push(scene.clone());
        }

        let mut log = ActionLog::with_retention(config.log.retention()?);
        for seed in &config.log_seed {
            let target = LogTarget::try_from(seed.device.clone())?;
            if let Some(id) = target.device_id()
                && !registry.contains(id.as_str())
            {
                return Err(NotFoundError {
                    device_id: id.to_string(),
                }
                .into());
            }
            let entry = ActionLogEntry::builder()
                .target(target)
                .action(seed.action.clone())
                .actor(seed.actor.clone().unwrap_or_else(|| config.actor.clone()))
                .timestamp(seed.timestamp.unwrap_or_else(|| clock.now()))
                .build();
            log.record(entry);
        }

        tracing::debug!(
            devices = registry.len(),
            scenes = scenes.len(),
            entries = log.len(),
            "automation engine ready"
        );

        Ok(Self {
            registry,
            log,
            scenes,
            actor: config.actor.clone(),
            publisher,
            clock,
        })
    }

    /// Look up a device snapshot. Unknown ids yield `None`.
    #[must_use]
    pub fn get_device(&self, id: &str) -> Option<&Device> {
        self.registry.get(id)
    }

    /// All devices in registration order.
    pub fn list_devices(&self) -> impl ExactSizeIterator<Item = &Device> {
        self.registry.list()
    }

    /// Registered scenes, in definition order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[must_use]
    pub fn action_log(&self) -> &ActionLog {
        &self.log
    }

    /// Matching log entries, most recent first.
    #[must_use]
    pub fn log(&self, filter: LogFilter) -> LogQuery<'_> {
        self.log.query(filter)
    }

    /// Flip a two-valued device (light on/off, lock locked/unlocked) and log it.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] for unknown ids and
    /// [`PanelError::UnsupportedOperation`] for thermostat and fan devices.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: &str) -> Result<Device, PanelError> {
        self.try_toggle(id)
            .inspect_err(|err| tracing::warn!(%err, "toggle rejected"))
    }

    fn try_toggle(&mut self, id: &str) -> Result<Device, PanelError> {
        let device = self.registry.get(id).ok_or_else(|| NotFoundError {
            device_id: id.to_string(),
        })?;
        let next = device
            .state()
            .toggled()
            .ok_or_else(|| UnsupportedOperationError {
                operation: "toggle",
                device_id: id.to_string(),
                kind: device.kind(),
            })?;
        self.commit(id, DeviceValue::from(next), true)
    }

    /// Assign a value to any device.
    ///
    /// Out-of-range values are rejected, never clamped. Only logged when
    /// `options.log` is set.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] for unknown ids and
    /// [`PanelError::InvalidState`] for values outside the device's domain.
    #[tracing::instrument(skip(self))]
    pub fn set_value(
        &mut self,
        id: &str,
        value: DeviceValue,
        options: SetOptions,
    ) -> Result<Device, PanelError> {
        self.commit(id, value, options.log)
            .inspect_err(|err| tracing::warn!(%err, "set_value rejected"))
    }

    fn commit(&mut self, id: &str, value: DeviceValue, log: bool) -> Result<Device, PanelError> {
        let device = self.registry.set(id, value)?.clone();
        tracing::debug!(device_id = id, state = %device.state(), logged = log, "device updated");

        let entry = log.then(|| {
            let entry = ActionLogEntry::device_set(
                device.id().clone(),
                device.state(),
                self.actor.clone(),
                self.clock.now(),
            );
            self.log.record(entry.clone());
            entry
        });

        self.publisher.publish(StateChange {
            devices: vec![device.clone()],
            entry,
        });
        Ok(device)
    }

    /// Apply every target of a scene, then log one summary entry.
    ///
    /// All targets are checked before any is written; the registry is fully
    /// updated before the entry is recorded and the change published.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownScene`] when no scene has this name, or
    /// the first target's [`PanelError::NotFound`] / [`PanelError::InvalidState`].
    #[tracing::instrument(skip(self))]
    pub fn activate_scene(&mut self, name: &str) -> Result<Vec<Device>, PanelError> {
        self.try_activate_scene(name)
            .inspect_err(|err| tracing::warn!(%err, "scene activation rejected"))
    }

    fn try_activate_scene(&mut self, name: &str) -> Result<Vec<Device>, PanelError> {
        let scene = self
            .scenes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| UnknownSceneError {
                name: name.to_string(),
            })?;

        for target in &scene.targets {
            self.registry.check(target.device.as_str(), target.value)?;
        }

        let mut devices = Vec::with_capacity(scene.targets.len());
        for target in &scene.targets {
            let device = self.registry.set(target.device.as_str(), target.value)?;
            devices.push(device.clone());
        }

        let entry = ActionLogEntry::scene_activated(&scene.name, self.actor.clone(), self.clock.now());
        self.log.record(entry.clone());
        tracing::info!(scene = %scene.name, devices = devices.len(), "scene activated");

        self.publisher.publish(StateChange {
            devices: devices.clone(),
            entry: Some(entry),
        });
        Ok(devices)
    }
}
