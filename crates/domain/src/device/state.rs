//! Device state: a tagged union keyed by device kind.

use serde::{Deserialize, Serialize};

use super::DeviceKind;

/// On/off state of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    On,
    Off,
}

impl LightState {
    /// The other member of the two-valued domain.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }
}

impl std::fmt::Display for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// Locked/unlocked state of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
}

impl LockState {
    /// The other member of the two-valued domain.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Locked => Self::Unlocked,
            Self::Unlocked => Self::Locked,
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => f.write_str("LOCKED"),
            Self::Unlocked => f.write_str("UNLOCKED"),
        }
    }
}

/// Current state of a device. The variant always matches the device kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DeviceState {
    Light(LightState),
    Lock(LockState),
    /// Set point in degrees Celsius.
    Thermostat(f64),
    /// Speed level, `0` meaning off.
    Fan(u8),
}

impl DeviceState {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light(_) => DeviceKind::Light,
            Self::Lock(_) => DeviceKind::Lock,
            Self::Thermostat(_) => DeviceKind::Thermostat,
            Self::Fan(_) => DeviceKind::Fan,
        }
    }

    /// The flipped state for two-valued kinds, `None` otherwise.
    #[must_use]
    pub fn toggled(&self) -> Option<Self> {
        match self {
            Self::Light(s) => Some(Self::Light(s.toggled())),
            Self::Lock(s) => Some(Self::Lock(s.toggled())),
            Self::Thermostat(_) | Self::Fan(_) => None,
        }
    }

    /// Numeric reading for continuous kinds, `None` for discrete ones.
    #[must_use]
    pub fn level(&self) -> Option<f64> {
        match self {
            Self::Thermostat(v) => Some(*v),
            Self::Fan(v) => Some(f64::from(*v)),
            Self::Light(_) | Self::Lock(_) => None,
        }
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light(s) => s.fmt(f),
            Self::Lock(s) => s.fmt(f),
            // Whole degrees keep one decimal; anything finer prints in full.
            Self::Thermostat(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Thermostat(v) => write!(f, "{v}"),
            Self::Fan(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_restore_light_after_two_toggles() {
        let start = DeviceState::Light(LightState::Off);
        let twice = start.toggled().and_then(|s| s.toggled());
        assert_eq!(twice, Some(start));
    }

    #[test]
    fn should_flip_lock_state() {
        assert_eq!(LockState::Locked.toggled(), LockState::Unlocked);
        assert_eq!(LockState::Unlocked.toggled(), LockState::Locked);
    }

    #[test]
    fn should_not_toggle_continuous_states() {
        assert!(DeviceState::Thermostat(22.0).toggled().is_none());
        assert!(DeviceState::Fan(1).toggled().is_none());
    }

    #[test]
    fn should_display_uppercase_discrete_states() {
        assert_eq!(DeviceState::Light(LightState::On).to_string(), "ON");
        assert_eq!(DeviceState::Lock(LockState::Unlocked).to_string(), "UNLOCKED");
    }

    #[test]
    fn should_display_thermostat_with_one_decimal() {
        assert_eq!(DeviceState::Thermostat(22.0).to_string(), "22.0");
        assert_eq!(DeviceState::Fan(2).to_string(), "2");
    }

    #[test]
    fn should_display_thermostat_without_losing_digits() {
        assert_eq!(DeviceState::Thermostat(22.25).to_string(), "22.25");
        assert_eq!(DeviceState::Thermostat(24.5).to_string(), "24.5");
        assert_eq!(DeviceState::Thermostat(18.125).to_string(), "18.125");
    }

    #[test]
    fn should_serialize_state_with_kind_tag() {
        let json = serde_json::to_value(DeviceState::Fan(2)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "fan", "value": 2}));
    }
}
