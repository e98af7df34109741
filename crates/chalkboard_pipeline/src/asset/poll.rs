//! Bounded exponential backoff for job polling.

use chalkboard_models::PollingConfig;
use std::time::Duration;

/// Poll delays: `initial * factor^n`, capped at `max`, for `max_attempts` polls.
///
/// # Examples
///
/// ```
/// use chalkboard_models::PollingConfig;
/// use chalkboard_pipeline::PollSchedule;
/// use std::time::Duration;
///
/// let schedule = PollSchedule::from(&PollingConfig::default());
/// assert_eq!(schedule.delay(0), Duration::from_millis(2_000));
/// assert_eq!(schedule.delay(1), Duration::from_millis(3_000));
/// assert_eq!(schedule.delay(10), Duration::from_millis(5_000));
/// assert!(schedule.total_budget() <= Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PollSchedule {
    initial_ms: u64,
    factor: f64,
    max_ms: u64,
    max_attempts: u32,
}

impl PollSchedule {
    /// Create a schedule. A factor below 1 is treated as 1.
    pub fn new(initial: Duration, factor: f64, max: Duration, max_attempts: u32) -> Self {
        Self {
            initial_ms: initial.as_millis() as u64,
            factor: if factor.is_finite() { factor.max(1.0) } else { 1.0 },
            max_ms: max.as_millis() as u64,
            max_attempts,
        }
    }

    /// Number of polls before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before poll number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let grown = self.initial_ms as f64 * self.factor.powi(attempt.min(64) as i32);
        let capped = grown.min(self.max_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Sum of every delay in the schedule.
    pub fn total_budget(&self) -> Duration {
        (0..self.max_attempts).map(|n| self.delay(n)).sum()
    }
}

impl From<&PollingConfig> for PollSchedule {
    fn from(config: &PollingConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_interval_ms),
            config.factor,
            Duration::from_millis(config.max_interval_ms),
            config.max_attempts,
        )
    }
}
