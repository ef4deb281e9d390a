//! Device kind: the closed set of device categories.

use serde::{Deserialize, Serialize};

use super::NumericRange;

/// Category of a device. Determines its state domain and allowed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Lock,
    Thermostat,
    Fan,
}

impl DeviceKind {
    /// Whether the kind has a two-valued discrete domain and supports `toggle`.
    #[must_use]
    pub fn is_toggleable(self) -> bool {
        matches!(self, Self::Light | Self::Lock)
    }

    /// Numeric domain used when a device seed does not declare one.
    ///
    /// `None` for discrete kinds.
    #[must_use]
    pub fn default_range(self) -> Option<NumericRange> {
        match self {
            Self::Light | Self::Lock => None,
            Self::Thermostat => Some(NumericRange::continuous(10.0, 30.0)),
            Self::Fan => Some(NumericRange::stepped(0.0, 3.0, 1.0)),
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Lock => f.write_str("lock"),
            Self::Thermostat => f.write_str("thermostat"),
            Self::Fan => f.write_str("fan"),
        }
    }
}
