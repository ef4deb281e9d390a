//! Bounded numeric domain for continuous and step-quantized devices.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tolerance used when checking step alignment.
const STEP_TOLERANCE: f64 = 1e-9;

/// Closed numeric range `[min, max]`, optionally quantized to `min + k * step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    min: f64,
    max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
}

impl NumericRange {
    /// A continuous range. Bounds are checked by [`validate`](Self::validate).
    #[must_use]
    pub const fn continuous(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    /// A step-quantized range.
    #[must_use]
    pub const fn stepped(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn step(&self) -> Option<f64> {
        self.step
    }

    /// Check the range itself is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] for non-finite or inverted
    /// bounds and [`ValidationError::InvalidStep`] for a non-positive step.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ValidationError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(ValidationError::InvalidStep(step));
            }
        }
        Ok(())
    }

    /// Whether `value` is inside the range and on a step boundary.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min || value > self.max {
            return false;
        }
        match self.step {
            None => true,
            Some(step) => {
                let steps = (value - self.min) / step;
                (steps - steps.round()).abs() < STEP_TOLERANCE
            }
        }
    }
}

impl std::fmt::Display for NumericRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)?;
        if let Some(step) = self.step {
            write!(f, " step {step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_contain_bounds_of_closed_range() {
        let range = NumericRange::continuous(10.0, 30.0);
        assert!(range.contains(10.0));
        assert!(range.contains(30.0));
        assert!(range.contains(22.5));
    }

    #[test]
    fn should_not_contain_values_outside_range() {
        let range = NumericRange::continuous(10.0, 30.0);
        assert!(!range.contains(9.99));
        assert!(!range.contains(99.0));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn should_reject_off_step_values() {
        let range = NumericRange::stepped(0.0, 3.0, 1.0);
        assert!(range.contains(2.0));
        assert!(!range.contains(1.5));
    }

    #[test]
    fn should_reject_inverted_range() {
        let result = NumericRange::continuous(30.0, 10.0).validate();
        assert!(matches!(result, Err(ValidationError::InvalidRange { .. })));
    }

    #[test]
    fn should_reject_zero_step() {
        let result = NumericRange::stepped(0.0, 3.0, 0.0).validate();
        assert!(matches!(result, Err(ValidationError::InvalidStep(_))));
    }

    #[test]
    fn should_display_step_when_present() {
        assert_eq!(NumericRange::stepped(0.0, 3.0, 1.0).to_string(), "0..=3 step 1");
        assert_eq!(NumericRange::continuous(10.0, 30.5).to_string(), "10..=30.5");
    }

    #[test]
    fn should_parse_range_from_toml() {
        let range: NumericRange = toml::from_str("min = 16.0\nmax = 26.0").unwrap();
        assert_eq!(range, NumericRange::continuous(16.0, 26.0));
    }
}
