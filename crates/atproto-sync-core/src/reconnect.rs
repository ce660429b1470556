//! Reconnection backoff strategies.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

/// How the engine schedules the delay before a reconnect attempt.
///
/// Cloning is cheap: the `Custom` variant wraps its closure in an `Arc`.
#[derive(Clone)]
pub enum ReconnectStrategy {
    /// `min(base * 2^attempt, max_backoff) + uniform(0, 10% of that delay)`,
    /// with `base` = 1 s.
    Exponential {
        /// Ceiling on the computed delay, before jitter is added.
        max_backoff: Duration,
    },
    /// A caller-supplied pure function of the attempt index. Lets callers
    /// encode decorrelated-jitter or other strategies without a library
    /// change.
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl std::fmt::Debug for ReconnectStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exponential { max_backoff } => {
                f.debug_struct("Exponential").field("max_backoff", max_backoff).finish()
            }
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Default for ReconnectStrategy {
    fn default() -> Self {
        Self::Exponential { max_backoff: Duration::from_secs(60) }
    }
}

impl ReconnectStrategy {
    /// Creates the default exponential strategy with a custom ceiling.
    pub fn exponential(max_backoff: Duration) -> Self {
        Self::Exponential { max_backoff }
    }

    /// Creates a custom strategy from a pure `attempt -> delay` function.
    pub fn custom(f: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Computes the delay before the `attempt`-th reconnect (0-indexed),
    /// including jitter for the exponential strategy.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Self::Exponential { max_backoff } => exponential_backoff_with_jitter(attempt, *max_backoff),
            Self::Custom(f) => f(attempt),
        }
    }
}

fn exponential_backoff_with_jitter(attempt: u32, max_backoff: Duration) -> Duration {
    let base = Duration::from_secs(1);
    let scaled = base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    let capped = scaled.min(max_backoff);
    let jitter_max = capped.as_secs_f64() * 0.1;
    let jitter = rand::thread_rng().gen_range(0.0..=jitter_max.max(0.0));
    capped + Duration::from_secs_f64(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delays_stay_within_bounds() {
        let strategy = ReconnectStrategy::default();
        let expected_base = [1.0, 2.0, 4.0, 8.0];
        for (attempt, base) in expected_base.iter().enumerate() {
            let delay = strategy.delay_for(attempt as u32).as_secs_f64();
            assert!(delay >= *base, "attempt {attempt}: {delay} < {base}");
            assert!(delay <= base * 1.1 + 1e-9, "attempt {attempt}: {delay} > {}", base * 1.1);
        }
    }

    #[test]
    fn exponential_caps_at_max_backoff() {
        let strategy = ReconnectStrategy::exponential(Duration::from_secs(60));
        let delay = strategy.delay_for(10).as_secs_f64();
        assert!(delay >= 60.0);
        assert!(delay <= 66.0);
    }

    #[test]
    fn custom_strategy_is_invoked_with_attempt_index() {
        let strategy = ReconnectStrategy::custom(|attempt| Duration::from_millis(100 * attempt as u64));
        assert_eq!(strategy.delay_for(3), Duration::from_millis(300));
    }
}
