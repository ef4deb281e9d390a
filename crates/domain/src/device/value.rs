//! Requested values: what a caller or configuration asks a device to become.
//!
//! A [`DeviceValue`] is loosely shaped on purpose: it comes from outside
//! (console input, scene definitions) and is only turned into a
//! [`DeviceState`] once checked against the device's domain.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DeviceState, LightState, LockState};

/// A discrete token accepted by light and lock devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discrete {
    On,
    Off,
    Locked,
    Unlocked,
}

impl std::fmt::Display for Discrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
            Self::Locked => f.write_str("LOCKED"),
            Self::Unlocked => f.write_str("UNLOCKED"),
        }
    }
}

/// A requested device value, unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceValue {
    Discrete(Discrete),
    Number(f64),
}

impl From<Discrete> for DeviceValue {
    fn from(value: Discrete) -> Self {
        Self::Discrete(value)
    }
}

impl From<f64> for DeviceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<LightState> for DeviceValue {
    fn from(value: LightState) -> Self {
        match value {
            LightState::On => Self::Discrete(Discrete::On),
            LightState::Off => Self::Discrete(Discrete::Off),
        }
    }
}

impl From<LockState> for DeviceValue {
    fn from(value: LockState) -> Self {
        match value {
            LockState::Locked => Self::Discrete(Discrete::Locked),
            LockState::Unlocked => Self::Discrete(Discrete::Unlocked),
        }
    }
}

impl From<DeviceState> for DeviceValue {
    fn from(state: DeviceState) -> Self {
        match state {
            DeviceState::Light(s) => s.into(),
            DeviceState::Lock(s) => s.into(),
            DeviceState::Thermostat(v) => Self::Number(v),
            DeviceState::Fan(v) => Self::Number(f64::from(v)),
        }
    }
}

impl std::fmt::Display for DeviceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discrete(d) => d.fmt(f),
            Self::Number(v) => write!(f, "{v}"),
        }
    }
}

/// Error returned when text is neither a known token nor a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is neither a device state nor a number")]
pub struct ParseValueError(pub String);

impl FromStr for DeviceValue {
    type Err = ParseValueError;

    /// Tokens are case-insensitive (`on`, `OFF`, `Locked`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let discrete = match token.to_ascii_lowercase().as_str() {
            "on" => Some(Discrete::On),
            "off" => Some(Discrete::Off),
            "locked" => Some(Discrete::Locked),
            "unlocked" => Some(Discrete::Unlocked),
            _ => None,
        };
        if let Some(d) = discrete {
            return Ok(Self::Discrete(d));
        }
        token
            .parse::<f64>()
            .map(Self::Number)
            .map_err(|_| ParseValueError(s.to_string()))
    }
}
