use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

/// Delay schedule for status polls of an analysis job.
///
/// The first delay is `interval`; each following delay doubles up to
/// `max_interval`. Polling gives up once `max_wait` would be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(300),
        }
    }
}

impl PollPolicy {
    /// Constant-interval schedule.
    #[must_use]
    pub fn fixed(interval: Duration, max_wait: Duration) -> Self {
        Self {
            interval,
            max_interval: interval,
            max_wait,
        }
    }

    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let interval = self.interval.min(self.max_interval);
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        std::iter::once(interval).chain(
            ExponentialBackoff::from_millis(2)
                .factor(interval_ms)
                .max_delay(self.max_interval),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double_until_capped() {
        let policy = PollPolicy {
            interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(500),
            max_wait: Duration::from_secs(10),
        };

        let delays: Vec<u128> = policy.delays().take(6).map(|d| d.as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400, 500, 500, 500]);
    }

    #[test]
    fn test_fixed_policy_never_grows() {
        let policy = PollPolicy::fixed(Duration::from_millis(250), Duration::from_secs(1));
        assert!(
            policy
                .delays()
                .take(10)
                .all(|d| d == Duration::from_millis(250))
        );
    }
}
