//! Device: a virtual appliance with an id, a kind and a strongly typed state.
//!
//! A [`Device`] can only ever hold a state that lies in its domain: the
//! builder checks the initial state, and [`Device::apply`] checks every
//! subsequent one before writing.

mod kind;
mod range;
mod state;
mod value;

pub use kind::DeviceKind;
pub use range::NumericRange;
pub use state::{DeviceState, LightState, LockState};
pub use value::{DeviceValue, Discrete, ParseValueError};

use serde::Serialize;

use crate::error::{InvalidStateError, PanelError, ValidationError};
use crate::id::DeviceId;

/// A registered device and its current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    id: DeviceId,
    kind: DeviceKind,
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<NumericRange>,
    state: DeviceState,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Numeric domain, present only for thermostat and fan devices.
    #[must_use]
    pub fn range(&self) -> Option<&NumericRange> {
        self.range.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Check `value` against this device's domain without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] when the value has the wrong shape for the
    /// kind or lies outside the numeric range.
    pub fn resolve(&self, value: &DeviceValue) -> Result<DeviceState, InvalidStateError> {
        resolve(&self.id, self.kind, self.range.as_ref(), value)
    }

    /// Replace the state after checking it. On error the device is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] when `value` is outside the domain.
    pub fn apply(&mut self, value: &DeviceValue) -> Result<&DeviceState, InvalidStateError> {
        self.state = self.resolve(value)?;
        Ok(&self.state)
    }

    /// Human-readable domain, used in error messages.
    #[must_use]
    pub fn expected(&self) -> String {
        expected(self.kind, self.range.as_ref())
    }
}

fn expected(kind: DeviceKind, range: Option<&NumericRange>) -> String {
    match (kind, range) {
        (DeviceKind::Light, _) => "ON or OFF".to_string(),
        (DeviceKind::Lock, _) => "LOCKED or UNLOCKED".to_string(),
        (DeviceKind::Thermostat | DeviceKind::Fan, Some(range)) => range.to_string(),
        (DeviceKind::Thermostat | DeviceKind::Fan, None) => "a number".to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn resolve(
    id: &DeviceId,
    kind: DeviceKind,
    range: Option<&NumericRange>,
    value: &DeviceValue,
) -> Result<DeviceState, InvalidStateError> {
    let state = match (kind, value) {
        (DeviceKind::Light, DeviceValue::Discrete(Discrete::On)) => {
            Some(DeviceState::Light(LightState::On))
        }
        (DeviceKind::Light, DeviceValue::Discrete(Discrete::Off)) => {
            Some(DeviceState::Light(LightState::Off))
        }
        (DeviceKind::Lock, DeviceValue::Discrete(Discrete::Locked)) => {
            Some(DeviceState::Lock(LockState::Locked))
        }
        (DeviceKind::Lock, DeviceValue::Discrete(Discrete::Unlocked)) => {
            Some(DeviceState::Lock(LockState::Unlocked))
        }
        (DeviceKind::Thermostat, DeviceValue::Number(v)) => range
            .filter(|r| r.contains(*v))
            .map(|_| DeviceState::Thermostat(*v)),
        // The builder guarantees fan ranges are integral and within u8.
        (DeviceKind::Fan, DeviceValue::Number(v)) => range
            .filter(|r| r.contains(*v))
            .map(|_| DeviceState::Fan(v.round() as u8)),
        _ => None,
    };
    state.ok_or_else(|| InvalidStateError {
        device_id: id.to_string(),
        value: value.to_string(),
        expected: expected(kind, range),
    })
}

fn validate_range(kind: DeviceKind, range: Option<&NumericRange>) -> Result<(), ValidationError> {
    match (kind, range) {
        (DeviceKind::Light | DeviceKind::Lock, None) => Ok(()),
        (DeviceKind::Light | DeviceKind::Lock, Some(_)) => Err(ValidationError::RangeMismatch {
            kind,
            expectation: "do not take",
        }),
        (DeviceKind::Thermostat | DeviceKind::Fan, None) => Err(ValidationError::RangeMismatch {
            kind,
            expectation: "require",
        }),
        (DeviceKind::Thermostat, Some(range)) => range.validate(),
        (DeviceKind::Fan, Some(range)) => {
            range.validate()?;
            let integral = |v: f64| v.fract() == 0.0;
            let step_ok = range.step().is_some_and(integral);
            if range.min() < 0.0
                || range.max() > f64::from(u8::MAX)
                || !integral(range.min())
                || !step_ok
            {
                return Err(ValidationError::FanRangeOverflow);
            }
            Ok(())
        }
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<String>,
    kind: Option<DeviceKind>,
    name: Option<String>,
    description: Option<String>,
    range: Option<NumericRange>,
    initial: Option<DeviceValue>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the kind's default numeric domain.
    #[must_use]
    pub fn range(mut self, range: NumericRange) -> Self {
        self.range = Some(range);
        self
    }

    #[must_use]
    pub fn initial(mut self, value: impl Into<DeviceValue>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Validation`] for a bad id, a missing kind or
    /// initial state, or a range that does not fit the kind, and
    /// [`PanelError::InvalidState`] when the initial state is outside the
    /// domain.
    pub fn build(self) -> Result<Device, PanelError> {
        let id = DeviceId::new(self.id.unwrap_or_default())?;
        let kind = self
            .kind
            .ok_or_else(|| ValidationError::MissingKind(id.to_string()))?;
        let range = self.range.or_else(|| kind.default_range());
        validate_range(kind, range.as_ref())?;
        let initial = self
            .initial
            .ok_or_else(|| ValidationError::MissingState(id.to_string()))?;
        let state = resolve(&id, kind, range.as_ref(), &initial)?;

        Ok(Device {
            name: self.name.unwrap_or_else(|| id.to_string()),
            description: self.description.unwrap_or_default(),
            id,
            kind,
            range,
            state,
        })
    }
}
