//! Scoped release: `close`, `and_finally` and `using`.
//!
//! When a finally block or a release fails after the chain already failed,
//! the chain's error stays primary and the later one is attached to it as
//! `TryError::Suppressed`. When the chain had succeeded, the later error
//! simply becomes the failure.

use super::Try;
use crate::error::{BoxError, TryError};
use crate::resource::Closeable;

impl<T: Closeable> Try<T> {
    /// Releases the success value. Closing a failure does nothing.
    ///
    /// Whether a second `close` releases again is up to `T`;
    /// [`Resource`](crate::Resource) releases exactly once.
    pub fn close(&mut self) -> Result<(), TryError> {
        match self {
            Try::Success(value) => value.close().map_err(TryError::new),
            Try::Failure(_) => Ok(()),
        }
    }
}

impl<T> Try<T> {
    /// Runs `runnable` whatever the state of the chain.
    pub fn and_finally<E: Into<BoxError>>(self, runnable: impl FnOnce() -> Result<(), E>) -> Self {
        match (self, runnable()) {
            (chain, Ok(())) => chain,
            (Try::Success(_), Err(e)) => Try::failure(e),
            (Try::Failure(primary), Err(e)) => {
                Try::Failure(primary.with_suppressed(TryError::new(e)))
            }
        }
    }

    /// Acquires a resource, runs `body` with it and always closes it
    /// afterwards, like a try-with-resources block.
    ///
    /// `body` is not run if `acquire` fails.
    pub fn using<C, EA, EB>(
        acquire: impl FnOnce() -> Result<C, EA>,
        body: impl FnOnce(&mut C) -> Result<T, EB>,
    ) -> Self
    where
        C: Closeable,
        EA: Into<BoxError>,
        EB: Into<BoxError>,
    {
        Try::of(acquire).flat_map(|mut resource| {
            Try::from_result(body(&mut resource)).and_finally(|| resource.close())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use std::cell::Cell;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counted<E>(counter: &Arc<AtomicU32>, outcome: Result<(), E>) -> Resource<u32>
    where
        E: Into<BoxError> + Send + 'static,
    {
        let counter = counter.clone();
        Resource::new(0, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            outcome
        })
    }

    #[test]
    fn double_close_releases_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut t = Try::success(counted(&counter, Ok::<_, BoxError>(())));
        t.close().unwrap();
        t.close().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        drop(t);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closing_failure_is_noop() {
        let mut t: Try<Resource<u32>> = Try::failure("never acquired");
        assert!(t.close().is_ok());
    }

    #[test]
    fn close_reports_release_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut t = Try::success(counted(&counter, Err("stuck")));
        assert_eq!(t.close().unwrap_err().to_string(), "stuck");
    }

    #[test]
    fn and_finally_runs_for_both_states() {
        let runs = Cell::new(0);
        let bump = || {
            runs.set(runs.get() + 1);
            Ok::<_, BoxError>(())
        };
        assert!(Try::success(1).and_finally(bump).is_success());
        assert!(Try::<i32>::failure("x").and_finally(bump).is_failure());
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn failing_finally_fails_a_successful_chain() {
        let t = Try::success(1).and_finally(|| Err("cleanup failed"));
        let err = t.or_else_throw().unwrap_err();
        assert_eq!(err.to_string(), "cleanup failed");
        assert!(err.suppressed().is_none());
    }

    #[test]
    fn chain_error_stays_primary_when_finally_also_fails() {
        let t = Try::<i32>::failure("main failed").and_finally(|| Err("cleanup failed"));
        let err = t.or_else_throw().unwrap_err();
        assert!(matches!(err, TryError::Suppressed { .. }));
        assert_eq!(err.primary().to_string(), "main failed");
        assert_eq!(
            err.suppressed().map(ToString::to_string),
            Some("cleanup failed".to_string())
        );
    }

    #[test]
    fn using_releases_after_body() {
        let counter = Arc::new(AtomicU32::new(0));
        let t = Try::using(
            || Ok::<_, BoxError>(counted(&counter, Ok::<_, BoxError>(()))),
            |res| {
                **res += 5;
                Ok::<_, BoxError>(**res * 2)
            },
        );
        assert_eq!(t.optional(), Some(10));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn using_releases_when_body_fails() {
        let counter = Arc::new(AtomicU32::new(0));
        let t: Try<u32> = Try::using(
            || Ok::<_, BoxError>(counted(&counter, Ok::<_, BoxError>(()))),
            |_| Err("body failed"),
        );
        assert_eq!(t.or_else_throw().unwrap_err().to_string(), "body failed");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn using_attaches_release_error_to_body_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let t: Try<u32> = Try::using(
            || Ok::<_, BoxError>(counted(&counter, Err("release failed"))),
            |_| Err("body failed"),
        );
        let err = t.or_else_throw().unwrap_err();
        assert_eq!(err.to_string(), "body failed (suppressed: release failed)");
    }

    #[test]
    fn using_skips_body_when_acquire_fails() {
        let called = Cell::new(false);
        let t: Try<u32> = Try::using(
            || Err::<Resource<u32>, _>("no handle"),
            |_| {
                called.set(true);
                Ok::<_, BoxError>(1)
            },
        );
        assert!(!called.get());
        assert_eq!(t.or_else_throw().unwrap_err().to_string(), "no handle");
    }
}
