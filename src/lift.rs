//! Higher-order helpers turning partial functions into total ones.
//!
//! A partial function here is any `FnMut(A) -> Result<R, E>`. Each helper
//! wraps it into a function that never fails: the error is kept as a value
//! ([`to_try`], [`to_either`]), reported and dropped ([`to_option_with`]) or
//! replaced by a fallback ([`catching_mapper`]).

use std::time::{Duration, Instant};

use crate::either::Either;
use crate::error::{BoxError, TryError};
use crate::fallible::Try;

/// `A -> Result<R, E>` becomes `A -> Try<R>`.
pub fn to_try<A, R, E>(f: impl FnMut(A) -> Result<R, E>) -> impl FnMut(A) -> Try<R>
where
    E: Into<BoxError>,
{
    Try::lift(f)
}

/// `A -> Result<R, E>` becomes `A -> Either<TryError, R>`.
pub fn to_either<A, R, E>(
    mut f: impl FnMut(A) -> Result<R, E>,
) -> impl FnMut(A) -> Either<TryError, R>
where
    E: Into<BoxError>,
{
    move |a| match f(a) {
        Ok(r) => Either::Right(r),
        Err(e) => Either::Left(TryError::new(e)),
    }
}

/// `A -> Result<R, E>` becomes `A -> Option<R>`, discarding errors.
pub fn to_option<A, R, E>(mut f: impl FnMut(A) -> Result<R, E>) -> impl FnMut(A) -> Option<R> {
    move |a| f(a).ok()
}

/// Like [`to_option`], but the rejected input and its error are handed to
/// `on_error` before being dropped.
pub fn to_option_with<A, R, E>(
    mut f: impl FnMut(A) -> Result<R, E>,
    mut on_error: impl FnMut(&A, E),
) -> impl FnMut(A) -> Option<R>
where
    A: Clone,
{
    move |a| match f(a.clone()) {
        Ok(r) => Some(r),
        Err(e) => {
            on_error(&a, e);
            None
        }
    }
}

/// Replaces every error with the value computed by `on_error`.
pub fn catching_mapper<A, R, E>(
    mut f: impl FnMut(A) -> Result<R, E>,
    mut on_error: impl FnMut(&A, E) -> R,
) -> impl FnMut(A) -> R
where
    A: Clone,
{
    move |a| f(a.clone()).unwrap_or_else(|e| on_error(&a, e))
}

/// Wall-clock time taken by `f`.
pub fn measure(f: impl FnOnce()) -> Duration {
    let start = Instant::now();
    f();
    start.elapsed()
}

/// Runs `f` and returns its result together with the time it took.
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
