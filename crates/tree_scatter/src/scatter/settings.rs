//! Settings for a tree scatter run and the sampling budget that bounds it.
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attempt cap used by [`SamplingBudget::default`].
pub const DEFAULT_MAX_ATTEMPTS: u64 = 10_000_000;

/// How often (in attempts) the wall-clock deadline is checked.
pub(crate) const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Inclusive `[min, max]` range for a random scale.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range that always yields `value`.
    pub fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::InvalidConfig(format!("{name} must be finite")));
        }
        if self.min <= 0.0 {
            return Err(Error::InvalidConfig(format!("{name}.min must be > 0")));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "{name}.min must be <= {name}.max"
            )));
        }
        Ok(())
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::fixed(1.0)
    }
}

/// Upper bounds on the rejection loop. `None` means unbounded for that dimension.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingBudget {
    /// Maximum number of candidate draws.
    pub max_attempts: Option<u64>,
    /// Maximum wall-clock time for the run.
    pub max_duration: Option<Duration>,
}

impl SamplingBudget {
    /// No limits: the run loops until the target count is reached.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            max_duration: None,
        }
    }

    pub fn attempts(max_attempts: u64) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            max_duration: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.max_duration.is_none()
    }
}

impl Default for SamplingBudget {
    fn default() -> Self {
        Self::attempts(DEFAULT_MAX_ATTEMPTS)
    }
}

/// The limit that ended a run early.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetLimit {
    Attempts,
    Duration,
}

/// Configuration for a tree scatter run.
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSettings {
    /// Number of trees to place.
    pub target_count: usize,
    /// Range for the height scale.
    pub height_range: ScaleRange,
    /// Range for the width scale, ignored while `lock_width_to_height` is set.
    pub width_range: ScaleRange,
    /// Use the drawn height scale as width scale.
    pub lock_width_to_height: bool,
    /// Number of tree prototypes to pick from.
    pub prototype_count: usize,
    /// Bound on the rejection loop.
    pub budget: SamplingBudget,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            target_count: 10_000,
            height_range: ScaleRange::default(),
            width_range: ScaleRange::default(),
            lock_width_to_height: true,
            prototype_count: 1,
            budget: SamplingBudget::default(),
        }
    }
}

impl ScatterSettings {
    /// Creates settings for `target_count` trees with defaults for everything else.
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            ..Default::default()
        }
    }

    pub fn with_height_range(mut self, min: f32, max: f32) -> Self {
        self.height_range = ScaleRange::new(min, max);
        self
    }

    /// Sets the width range and unlocks width from height.
    pub fn with_width_range(mut self, min: f32, max: f32) -> Self {
        self.width_range = ScaleRange::new(min, max);
        self.lock_width_to_height = false;
        self
    }

    pub fn with_lock_width_to_height(mut self, lock: bool) -> Self {
        self.lock_width_to_height = lock;
        self
    }

    pub fn with_prototype_count(mut self, prototype_count: usize) -> Self {
        self.prototype_count = prototype_count;
        self
    }

    pub fn with_budget(mut self, budget: SamplingBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Validates the settings, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.prototype_count == 0 {
            return Err(Error::NoPrototypes);
        }
        self.height_range.validate("height_range")?;
        if !self.lock_width_to_height {
            self.width_range.validate("width_range")?;
        }
        if self.budget.max_duration == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig(
                "budget.max_duration must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_editor_tool() {
        let s = ScatterSettings::default();
        assert_eq!(s.target_count, 10_000);
        assert_eq!(s.height_range, ScaleRange::fixed(1.0));
        assert!(s.lock_width_to_height);
        assert_eq!(s.budget.max_attempts, Some(DEFAULT_MAX_ATTEMPTS));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_prototypes_is_rejected() {
        let s = ScatterSettings::new(10).with_prototype_count(0);
        assert!(matches!(s.validate(), Err(Error::NoPrototypes)));
    }

    #[test]
    fn inverted_or_non_positive_heights_are_rejected() {
        let s = ScatterSettings::new(1).with_height_range(2.0, 1.0);
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
        let s = ScatterSettings::new(1).with_height_range(0.0, 1.0);
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
        let s = ScatterSettings::new(1).with_height_range(f32::NAN, 1.0);
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn width_range_only_checked_when_unlocked() {
        let mut s = ScatterSettings::new(1);
        s.width_range = ScaleRange::new(3.0, 1.0);
        assert!(s.validate().is_ok());
        let s = s.with_lock_width_to_height(false);
        assert!(s.validate().is_err());
    }

    #[test]
    fn with_width_range_unlocks_width() {
        let s = ScatterSettings::new(1).with_width_range(0.5, 1.5);
        assert!(!s.lock_width_to_height);
        assert!(s.width_range.contains(1.0));
    }

    #[test]
    fn budget_builders() {
        assert!(SamplingBudget::unbounded().is_unbounded());
        let b = SamplingBudget::unbounded().with_max_duration(Duration::from_millis(5));
        assert!(!b.is_unbounded());
        assert_eq!(b.max_attempts, None);
        let s = ScatterSettings::new(1)
            .with_budget(SamplingBudget::unbounded().with_max_duration(Duration::ZERO));
        assert!(s.validate().is_err());
    }
}
