use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GameConfig;

/// Maps the current score to the tick interval a host should use.
///
/// Implementations must be non-increasing in `score`.
pub trait SpeedPolicy: Debug + Send + Sync {
    fn interval_for(&self, score: u32) -> Duration;
}

/// Constant cadence of the classic variant.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl SpeedPolicy for FixedInterval {
    fn interval_for(&self, _score: u32) -> Duration {
        self.interval
    }
}

/// Speeds up by `step` each time eating lands the score on a positive
/// multiple of `threshold`, never below `floor`.
///
/// Scores only move in `reward` increments, so those eating ticks are exactly
/// the multiples of `lcm(reward, threshold)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SteppedInterval {
    initial: Duration,
    step: Duration,
    floor: Duration,
    /// Score distance between two speed-ups; `None` when the score never moves.
    period: Option<u64>,
}

impl SteppedInterval {
    #[must_use]
    pub fn new(
        initial: Duration,
        step: Duration,
        floor: Duration,
        threshold: u32,
        reward: u32,
    ) -> Self {
        Self {
            initial,
            step,
            floor: floor.min(initial),
            period: speed_up_period(threshold.max(1), reward),
        }
    }
}

impl SpeedPolicy for SteppedInterval {
    fn interval_for(&self, score: u32) -> Duration {
        let Some(period) = self.period else {
            return self.initial;
        };

        let steps = u32::try_from(u64::from(score) / period).unwrap_or(u32::MAX);
        let reduction = self.step.saturating_mul(steps);
        self.initial.saturating_sub(reduction).max(self.floor)
    }
}

fn speed_up_period(threshold: u32, reward: u32) -> Option<u64> {
    if reward == 0 {
        return None;
    }

    let (threshold, reward) = (u64::from(threshold), u64::from(reward));
    Some(threshold / gcd(threshold, reward) * reward)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Policy selected by `config.speed_progression`.
#[must_use]
pub fn policy_for(config: &GameConfig) -> Arc<dyn SpeedPolicy> {
    let initial = config.initial_tick_interval();
    if !config.speed_progression {
        return Arc::new(FixedInterval::new(initial));
    }

    Arc::new(SteppedInterval::new(
        initial,
        Duration::from_millis(config.speed_step_ms),
        Duration::from_millis(config.min_tick_interval_ms),
        config.speed_threshold,
        config.food_reward,
    ))
}
