//! Retrying fallible operations with a pluggable backoff.
//!
//! The operation runs on the calling thread; between attempts the thread
//! sleeps for the pause chosen by a [`Backoff`]. Which errors are worth
//! another attempt is decided by a predicate over the captured [`TryError`],
//! and every failed attempt can be reported to an error handler.

use std::fmt;
use std::thread;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{BoxError, TryError};
use crate::fallible::Try;

/// How long to pause before retry number `step` (0-indexed).
///
/// Every variant is total: no configuration, deserialized or built by hand,
/// makes [`Backoff::delay`] panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backoff {
    /// The same pause every time.
    Fixed { delay: Duration },

    /// Starts at `min` and doubles on each step, never exceeding `max`.
    /// A `min` above `max` pauses for `max` every time.
    Exponential { min: Duration, max: Duration },

    /// Adds a random pause of up to `max_jitter` on top of `base`.
    Jittered {
        base: Box<Backoff>,
        max_jitter: Duration,
    },
}

impl Backoff {
    /// No pause at all.
    pub const NONE: Self = Backoff::Fixed {
        delay: Duration::ZERO,
    };

    /// Pauses for `delay` before every retry.
    pub fn fixed(delay: Duration) -> Self {
        Backoff::Fixed { delay }
    }

    /// Doubles from `min` up to `max`.
    pub fn exponential(min: Duration, max: Duration) -> Self {
        Backoff::Exponential { min, max }
    }

    /// Spreads retries of concurrent callers apart.
    pub fn with_jitter(self, max_jitter: Duration) -> Self {
        Backoff::Jittered {
            base: Box::new(self),
            max_jitter,
        }
    }

    /// The pause before retry `step`.
    pub fn delay(&self, step: u32) -> Duration {
        match self {
            Backoff::Fixed { delay } => *delay,
            Backoff::Exponential { min, max } => 2u32
                .checked_pow(step)
                .and_then(|factor| min.checked_mul(factor))
                .map_or(*max, |delay| delay.min(*max)),
            Backoff::Jittered { base, max_jitter } => {
                base.delay(step).saturating_add(random_jitter(*max_jitter))
            }
        }
    }
}

fn random_jitter(max_jitter: Duration) -> Duration {
    let bound = u64::try_from(max_jitter.as_nanos()).unwrap_or(u64::MAX);
    Duration::from_nanos(rand::rng().random_range(0..=bound))
}

/// How often to retry and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt; zero means a single attempt.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryConfig {
    /// Three retries, pausing 100ms, 200ms, then 400ms.
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        backoff: Backoff::Exponential {
            min: Duration::from_millis(100),
            max: Duration::from_secs(2),
        },
    };

    /// A single attempt.
    pub const NONE: Self = Self {
        max_retries: 0,
        backoff: Backoff::NONE,
    };

    /// Creates a retry configuration.
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// The pause before retry `step` (0-indexed).
    pub fn delay_for_attempt(&self, step: u32) -> Duration {
        self.backoff.delay(step)
    }

    /// The pauses of a run that uses up every retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|step| self.backoff.delay(step))
    }

    /// Total number of attempts, including the initial one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of a retried operation.
#[derive(Debug)]
pub enum RetryResult<T> {
    /// The operation succeeded.
    Success {
        value: T,
        /// Number of attempts made, including the successful one.
        attempts: u32,
    },

    /// Every attempt failed with a retriable error.
    ExhaustedRetries {
        /// The last error encountered.
        last_error: TryError,
        /// Number of attempts made (including the initial attempt).
        attempts: u32,
    },

    /// An attempt failed with an error the retry predicate rejected.
    Aborted { error: TryError, attempts: u32 },
}

impl<T> RetryResult<T> {
    /// Converts to a `Try`, keeping the final error unchanged.
    pub fn into_try(self) -> Try<T> {
        match self {
            RetryResult::Success { value, .. } => Try::Success(value),
            RetryResult::ExhaustedRetries { last_error, .. } => Try::Failure(last_error),
            RetryResult::Aborted { error, .. } => Try::Failure(error),
        }
    }

    /// Returns true if the result is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, RetryResult::Success { .. })
    }

    /// Number of attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryResult::Success { attempts, .. }
            | RetryResult::ExhaustedRetries { attempts, .. }
            | RetryResult::Aborted { attempts, .. } => *attempts,
        }
    }
}

type RetryPredicate<'a> = Box<dyn Fn(&TryError) -> bool + 'a>;
type ErrorHandler<'a> = Box<dyn FnMut(u32, u32, &TryError) + 'a>;

/// A configured retry loop.
///
/// ```
/// use std::time::Duration;
/// use lifted::retry::{Backoff, Retry, RetryConfig};
///
/// let mut calls = 0;
/// let value = Retry::new(RetryConfig::new(3, Backoff::fixed(Duration::ZERO)))
///     .run(|| {
///         calls += 1;
///         if calls < 3 { Err("not yet") } else { Ok(calls) }
///     })
///     .into_try()
///     .or_else_throw();
/// assert_eq!(value.unwrap(), 3);
/// ```
pub struct Retry<'a> {
    config: RetryConfig,
    retry_if: RetryPredicate<'a>,
    on_error: Option<ErrorHandler<'a>>,
}

impl<'a> Retry<'a> {
    /// Retries every error according to `config`.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            retry_if: Box::new(|_| true),
            on_error: None,
        }
    }

    /// Only errors accepted by `predicate` are retried; any other error ends
    /// the loop immediately.
    pub fn retry_if(mut self, predicate: impl Fn(&TryError) -> bool + 'a) -> Self {
        self.retry_if = Box::new(predicate);
        self
    }

    /// Called with `(attempt, max_attempts, error)` after every failed attempt.
    pub fn on_error(mut self, handler: impl FnMut(u32, u32, &TryError) + 'a) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Runs `operation` until it succeeds, fails with a non-retriable error,
    /// or the attempts are used up.
    pub fn run<T, E>(mut self, mut operation: impl FnMut() -> Result<T, E>) -> RetryResult<T>
    where
        E: Into<BoxError>,
    {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match operation() {
                Ok(value) => {
                    if attempt > 1 {
                        trace!(attempt, "operation succeeded after retry");
                    }
                    return RetryResult::Success {
                        value,
                        attempts: attempt,
                    };
                }
                Err(e) => TryError::new(e),
            };

            if let Some(handler) = self.on_error.as_mut() {
                handler(attempt, max_attempts, &error);
            }

            if !(self.retry_if)(&error) {
                return RetryResult::Aborted {
                    error,
                    attempts: attempt,
                };
            }
            if attempt >= max_attempts {
                return RetryResult::ExhaustedRetries {
                    last_error: error,
                    attempts: attempt,
                };
            }

            let delay = self.config.delay_for_attempt(attempt - 1);
            debug!(attempt, max_attempts, ?delay, %error, "attempt failed, retrying");
            thread::sleep(delay);
        }
    }
}

impl fmt::Debug for Retry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("config", &self.config)
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

/// Runs `operation` with the given configuration, retrying every error.
pub fn retry_with_backoff<T, E>(
    config: RetryConfig,
    operation: impl FnMut() -> Result<T, E>,
) -> RetryResult<T>
where
    E: Into<BoxError>,
{
    Retry::new(config).run(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig::new(max_retries, Backoff::fixed(Duration::from_millis(1)))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[derive(Debug)]
    struct Fatal;

    impl fmt::Display for Fatal {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fatal")
        }
    }

    impl std::error::Error for Fatal {}

    // ─── Unit Tests ───────────────────────────────────────────────────────────

    #[test]
    fn default_config_pauses_double() {
        let delays: Vec<_> = RetryConfig::default().delays().collect();
        assert_eq!(delays, vec![ms(100), ms(200), ms(400)]);
        assert_eq!(RetryConfig::NONE.delays().count(), 0);
    }

    #[test]
    fn fixed_backoff_never_changes() {
        let backoff = Backoff::fixed(ms(30));
        assert!((0..20).all(|step| backoff.delay(step) == ms(30)));
    }

    #[test]
    fn exponential_backoff_stops_at_max() {
        let backoff = Backoff::exponential(ms(10), ms(50));
        let delays: Vec<_> = (0..5).map(|step| backoff.delay(step)).collect();
        assert_eq!(delays, vec![ms(10), ms(20), ms(40), ms(50), ms(50)]);
    }

    #[test]
    fn exponential_backoff_saturates_instead_of_overflowing() {
        let backoff = Backoff::exponential(Duration::from_secs(1), Duration::MAX);
        assert_eq!(backoff.delay(10), Duration::from_secs(1024));
        assert_eq!(backoff.delay(40), Duration::MAX);
        assert_eq!(backoff.delay(u32::MAX), Duration::MAX);

        let jittered = backoff.with_jitter(Duration::MAX);
        assert_eq!(jittered.delay(64), Duration::MAX);
    }

    #[test]
    fn exponential_backoff_with_min_above_max_uses_max() {
        let backoff = Backoff::exponential(ms(500), ms(100));
        assert_eq!(backoff.delay(0), ms(100));
        assert_eq!(backoff.delay(3), ms(100));
    }

    #[test]
    fn zero_jitter_keeps_base_delay() {
        let backoff = Backoff::exponential(ms(10), ms(80)).with_jitter(Duration::ZERO);
        assert_eq!(backoff.delay(2), ms(40));
    }

    #[test]
    fn none_config_makes_single_attempt() {
        let calls = Cell::new(0);
        let result = retry_with_backoff(RetryConfig::NONE, || {
            calls.set(calls.get() + 1);
            Err::<(), _>("down")
        });
        assert!(matches!(result, RetryResult::ExhaustedRetries { attempts: 1, .. }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn success_on_first_attempt() {
        let result = retry_with_backoff(fast(3), || Ok::<_, BoxError>(42));
        assert!(result.is_success());
        assert_eq!(result.attempts(), 1);
        assert_eq!(result.into_try().optional(), Some(42));
    }

    #[test]
    fn succeeds_on_third_attempt() {
        let calls = Cell::new(0);
        let result = retry_with_backoff(fast(3), || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 { Err("temporary failure") } else { Ok(calls.get()) }
        });
        assert!(result.is_success());
        assert_eq!(result.attempts(), 3);
    }

    #[test]
    fn exhausts_retries() {
        let calls = Cell::new(0);
        let result = retry_with_backoff(fast(2), || {
            calls.set(calls.get() + 1);
            Err::<i32, _>("always fails")
        });
        match result {
            RetryResult::ExhaustedRetries { attempts, ref last_error } => {
                assert_eq!(attempts, 3);
                assert_eq!(last_error.to_string(), "always fails");
            }
            _ => panic!("Expected ExhaustedRetries"),
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn non_retriable_error_aborts() {
        let calls = Cell::new(0);
        let result = Retry::new(fast(5))
            .retry_if(|e| !e.is::<Fatal>())
            .run(|| {
                calls.set(calls.get() + 1);
                Err::<i32, _>(Fatal)
            });
        assert!(matches!(result, RetryResult::Aborted { attempts: 1, .. }));
        assert_eq!(calls.get(), 1);
        let err = result.into_try().or_else_throw().unwrap_err();
        assert!(err.is::<Fatal>());
    }

    #[test]
    fn error_handler_sees_every_failure() {
        let mut seen = Vec::new();
        let result = Retry::new(fast(2))
            .on_error(|attempt, max, e| seen.push((attempt, max, e.to_string())))
            .run(|| Err::<i32, _>("nope"));
        assert_eq!(result.attempts(), 3);
        assert_eq!(
            seen,
            vec![
                (1, 3, "nope".to_string()),
                (2, 3, "nope".to_string()),
                (3, 3, "nope".to_string()),
            ]
        );
    }

    #[test]
    fn config_deserializes_partial_documents() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 7}"#).unwrap();
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.backoff, RetryConfig::DEFAULT.backoff);

        let config: RetryConfig = serde_json::from_str(
            r#"{"backoff": {"kind": "jittered",
                            "base": {"kind": "fixed", "delay": {"secs": 1, "nanos": 0}},
                            "max_jitter": {"secs": 0, "nanos": 0}}}"#,
        )
        .unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.delay_for_attempt(5), Duration::from_secs(1));
    }

    #[test]
    fn config_rejects_negative_pauses() {
        let parsed = serde_json::from_str::<RetryConfig>(
            r#"{"backoff": {"kind": "fixed", "delay": {"secs": -2, "nanos": 0}}}"#,
        );
        assert!(parsed.is_err());
    }

    // ─── Property Tests ───────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn exponential_pauses_grow_until_max(
            min_ms in 0u64..1000,
            max_ms in 0u64..60000,
            steps in 1u32..70,
        ) {
            let backoff = Backoff::exponential(ms(min_ms), ms(max_ms));
            let delays: Vec<_> = (0..steps).map(|step| backoff.delay(step)).collect();
            prop_assert!(delays.iter().all(|d| *d <= ms(max_ms)));
            for pair in delays.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
        }

        #[test]
        fn jitter_stays_within_bound(
            base_ms in 0u64..1000,
            jitter_ms in 0u64..500,
            step in 0u32..10,
        ) {
            let backoff = Backoff::fixed(ms(base_ms)).with_jitter(ms(jitter_ms));
            let delay = backoff.delay(step);
            prop_assert!(delay >= ms(base_ms));
            prop_assert!(delay <= ms(base_ms + jitter_ms));
        }

        #[test]
        fn attempts_never_exceed_max(max_retries in 0u32..5, fail_for in 0u32..8) {
            let calls = Cell::new(0u32);
            let config = RetryConfig::new(max_retries, Backoff::NONE);
            let result = retry_with_backoff(config, || {
                calls.set(calls.get() + 1);
                if calls.get() <= fail_for { Err("fail") } else { Ok(()) }
            });
            prop_assert!(result.attempts() <= max_retries + 1);
            prop_assert_eq!(result.attempts(), calls.get());
            prop_assert_eq!(result.is_success(), fail_for <= max_retries);
        }
    }
}
