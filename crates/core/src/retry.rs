//! Exponential-backoff retry policy.
//!
//! Retrying is opt-in: the default policy allows a single attempt, so
//! clients never retry unless a caller explicitly raises
//! [`RetryPolicy::max_attempts`]. When retries are enabled the delay
//! grows exponentially, is clamped to a maximum, and gets uniform
//! jitter applied so concurrent callers do not poll in lockstep.

use std::time::Duration;

use rand::Rng;

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one. `1` disables
    /// retrying entirely.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

/// Calculate the next backoff delay from the current delay and policy.
///
/// The result is clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

/// Apply uniform jitter to a delay.
///
/// Returns a duration drawn uniformly from `[delay/2, delay]`, keeping
/// the backoff bounded while spreading out concurrent retriers.
pub fn jittered(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return delay;
    }
    let jittered_ms = rand::rng().random_range(ms / 2..=ms);
    Duration::from_millis(jittered_ms)
}
