//! Device registry: the canonical set of devices and their current state.
//!
//! [`DeviceRegistry::set`] is the single choke point for state changes: it
//! checks the requested value against the device's domain before writing, so
//! a rejected call leaves the registry untouched.

use std::collections::HashMap;

use homepanel_domain::device::{Device, DeviceState, DeviceValue};
use homepanel_domain::error::{NotFoundError, PanelError, ValidationError};
use homepanel_domain::id::DeviceId;

/// Owns every [`Device`], keyed by id, listed in registration order.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    index: HashMap<DeviceId, usize>,
}

impl DeviceRegistry {
    /// Register a fixed set of devices.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateDeviceId`] when two devices share an id.
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Result<Self, ValidationError> {
        let mut registry = Self::default();
        for device in devices {
            if registry.index.contains_key(device.id()) {
                return Err(ValidationError::DuplicateDeviceId(device.id().to_string()));
            }
            registry
                .index
                .insert(device.id().clone(), registry.devices.len());
            registry.devices.push(device);
        }
        Ok(registry)
    }

    /// Look up a device. Unknown ids yield `None`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Device> {
        self.index.get(id).map(|&idx| &self.devices[idx])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All devices in registration order.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Device> {
        self.devices.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Check that `value` would be accepted by `id` without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] for unknown ids and
    /// [`PanelError::InvalidState`] for out-of-domain values.
    pub fn check(&self, id: &str, value: DeviceValue) -> Result<DeviceState, PanelError> {
        let device = self.get(id).ok_or_else(|| not_found(id))?;
        Ok(device.resolve(&value)?)
    }

    /// Replace a device's state.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] for unknown ids and
    /// [`PanelError::InvalidState`] for out-of-domain values. Nothing is
    /// written in either case.
    pub fn set(&mut self, id: &str, value: DeviceValue) -> Result<&Device, PanelError> {
        let idx = *self.index.get(id).ok_or_else(|| not_found(id))?;
        let device = &mut self.devices[idx];
        device.apply(&value)?;
        Ok(&*device)
    }
}

fn not_found(id: &str) -> PanelError {
    NotFoundError {
        device_id: id.to_string(),
    }
    .into()
}
