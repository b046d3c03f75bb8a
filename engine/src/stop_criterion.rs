//! Stop criteria: predicates over a [`SearchMetrics`] snapshot, polled by
//! the search's background poller thread.

use std::time::Duration;

use heurist_core::ConfigError;

use crate::metrics::SearchMetrics;

const MIN_CHECK_PERIOD: Duration = Duration::from_millis(1);

/// Validates a stop-criterion poll period against the enforced minimum.
pub fn validate_check_period(period: Duration) -> Result<(), ConfigError> {
    if period < MIN_CHECK_PERIOD {
        Err(ConfigError::CheckPeriodTooShort(period))
    } else {
        Ok(())
    }
}

pub trait StopCriterion: Send + Sync {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool;
}

/// Stops once the search's runtime reaches `n`.
pub struct MaxRuntime(Duration);

impl MaxRuntime {
    pub fn new(n: Duration) -> Result<Self, ConfigError> {
        validate_check_period(n)?;
        Ok(Self(n))
    }
}

impl StopCriterion for MaxRuntime {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        metrics.runtime >= self.0
    }
}

/// Stops once the step counter reaches `n`.
pub struct MaxSteps(pub u64);

impl StopCriterion for MaxSteps {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        metrics.steps >= self.0
    }
}

/// Stops once `n` steps have elapsed without an improving move.
pub struct MaxStepsWithoutImprovement(pub u64);

impl StopCriterion for MaxStepsWithoutImprovement {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        metrics.steps_since_last_improvement >= self.0
    }
}

/// Stops once `n` has elapsed since the last improving move.
pub struct MaxTimeWithoutImprovement(pub Duration);

impl StopCriterion for MaxTimeWithoutImprovement {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        metrics.time_since_last_improvement >= self.0
    }
}

/// Stops once the most recent accepted move's improvement falls below `eps`.
pub struct MinDelta(pub f64);

impl StopCriterion for MinDelta {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        metrics.last_delta.is_some_and(|d| d < self.0)
    }
}

/// Stops once the best evaluation reaches `target` (direction-aware).
pub struct TargetValue(pub f64);

impl StopCriterion for TargetValue {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        metrics.best_value.is_some_and(|v| {
            if metrics.minimizing {
                v <= self.0
            } else {
                v >= self.0
            }
        })
    }
}

/// Stops as soon as any of its children do.
pub struct Composite(pub Vec<Box<dyn StopCriterion>>);

impl StopCriterion for Composite {
    fn should_stop(&self, metrics: &SearchMetrics) -> bool {
        self.0.iter().any(|c| c.should_stop(metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> SearchMetrics {
        SearchMetrics {
            minimizing: false,
            ..Default::default()
        }
    }

    #[test]
    fn check_period_below_minimum_errors() {
        assert!(validate_check_period(Duration::from_micros(500)).is_err());
        assert!(validate_check_period(Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn max_steps_fires_at_threshold() {
        let c = MaxSteps(10);
        let mut m = metrics();
        m.steps = 9;
        assert!(!c.should_stop(&m));
        m.steps = 10;
        assert!(c.should_stop(&m));
    }

    #[test]
    fn target_value_respects_direction() {
        let c = TargetValue(24.0);
        let mut m = metrics();
        m.best_value = Some(20.0);
        assert!(!c.should_stop(&m));
        m.best_value = Some(24.0);
        assert!(c.should_stop(&m));

        m.minimizing = true;
        m.best_value = Some(30.0);
        assert!(!c.should_stop(&m));
        m.best_value = Some(24.0);
        assert!(c.should_stop(&m));
    }

    #[test]
    fn composite_stops_on_first_true_child() {
        let c = Composite(vec![Box::new(MaxSteps(1000)), Box::new(MaxStepsWithoutImprovement(5))]);
        let mut m = metrics();
        m.steps_since_last_improvement = 5;
        assert!(c.should_stop(&m));
    }
}
