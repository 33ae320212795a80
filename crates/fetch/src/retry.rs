//! Exponential backoff for transient HTTP failures.

use crate::error::{ErrorKind, Result};
use std::time::Duration;

/// How many times to try a request, and how long to wait in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Total number of attempts, including the first. Zero is treated as one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Self::DEFAULT_BASE_DELAY,
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (0-indexed): `base * 2^retry`.
    ///
    /// ```
    /// use std::time::Duration;
    /// use sitemapped_fetch::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(5).with_base_delay(Duration::from_millis(100));
    /// assert_eq!(policy.delay(0), Duration::from_millis(100));
    /// assert_eq!(policy.delay(2), Duration::from_millis(400));
    /// ```
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2_u32.saturating_pow(retry))
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or
    /// the attempt budget runs out.
    ///
    /// The closure receives the 1-indexed attempt number. Running out of
    /// attempts wraps the last error in [`ErrorKind::RetriesExhausted`].
    pub fn run<T>(&self, mut attempt: impl FnMut(u32) -> Result<T>) -> Result<T> {
        let mut number = 1;
        loop {
            let err = match attempt(number) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !err.is_retryable() {
                return Err(err);
            }
            if number >= self.max_attempts {
                return Err(err.raise(ErrorKind::RetriesExhausted(self.max_attempts)));
            }
            let delay = self.delay(number - 1);
            tracing::warn!(
                attempt = number,
                max_attempts = self.max_attempts,
                ?delay,
                error = %*err,
                "Request failed, retrying"
            );
            std::thread::sleep(delay);
            number += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts).with_base_delay(Duration::ZERO)
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::new(3).with_base_delay(Duration::from_millis(10));
        let delays: Vec<Duration> = (0..5).map(|n| policy.delay(n)).collect();
        for pair in delays.windows(2) {
            assert_eq!(pair[1], pair[0] * 2);
        }
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(3).with_base_delay(Duration::from_secs(u64::MAX / 2));
        assert_eq!(policy.delay(40), Duration::MAX);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }

    #[test]
    fn test_succeeds_after_transient_failures() {
        let mut calls = 0;
        let result = instant(3).run(|n| {
            calls += 1;
            match n {
                1 => exn::bail!(ErrorKind::TooManyRequests),
                2 => exn::bail!(ErrorKind::Network),
                _ => Ok("body"),
            }
        });
        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exhaustion() {
        let mut calls = 0;
        let result: Result<()> = instant(3).run(|_| {
            calls += 1;
            exn::bail!(ErrorKind::ServerError(503))
        });
        let err = result.unwrap_err();
        assert_eq!(*err, ErrorKind::RetriesExhausted(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let mut calls = 0;
        let result: Result<()> = instant(5).run(|_| {
            calls += 1;
            exn::bail!(ErrorKind::Status(404))
        });
        assert_eq!(*result.unwrap_err(), ErrorKind::Status(404));
        assert_eq!(calls, 1);
    }
}
