//! The outcome of a computation that may fail.
//!
//! A [`Try`] is either `Success(T)` or `Failure(TryError)`. Fallible closures
//! are lifted into it with [`Try::of`]; from there the chain composes over the
//! wrapped value without unwrapping until a terminal call such as
//! [`Try::fold`] or [`Try::or_else_throw`].
//!
//! ```
//! use lifted::Try;
//!
//! let total = Try::of(|| "21".parse::<i32>())
//!     .map(|v| v * 2)
//!     .filter(|v| *v > 0)
//!     .recover(|| Ok::<_, std::num::ParseIntError>(0))
//!     .or_else_throw();
//! assert_eq!(total.unwrap(), 42);
//! ```
//!
//! Once a chain is a failure, the only way back is one of the `recover`
//! methods. Combinators taking a fallible closure (`try_map`,
//! `try_on_success`, `try_peek`, `and_finally`) turn an `Err` from that
//! closure into a failure instead of returning it to the caller. The
//! infallible ones (`map`, `on_success`, `peek`) do not guard against panics;
//! use [`Try::catch_unwind`] at the boundary when panics must be captured.

use std::panic::{self, UnwindSafe};

use crate::either::Either;
use crate::error::{BoxError, TryError, panic_message};

mod scoped;

/// Either a success value or the error that prevented it.
#[derive(Debug)]
#[must_use = "a Try may hold a failure that should be handled"]
pub enum Try<T> {
    /// The computation produced a value.
    Success(T),
    /// The computation failed.
    Failure(TryError),
}

// ─── Construction ─────────────────────────────────────────────────────────────

impl<T> Try<T> {
    /// Wraps a value as a success.
    pub fn success(value: T) -> Self {
        Try::Success(value)
    }

    /// Wraps an error as a failure.
    pub fn failure(error: impl Into<BoxError>) -> Self {
        Try::Failure(TryError::new(error))
    }

    /// `Ok` becomes a success, `Err` a failure.
    pub fn from_result<E: Into<BoxError>>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Try::Success(value),
            Err(e) => Try::failure(e),
        }
    }

    /// Runs `supplier` now and captures its outcome.
    pub fn of<E: Into<BoxError>>(supplier: impl FnOnce() -> Result<T, E>) -> Self {
        Self::from_result(supplier())
    }

    /// Runs `f` now, turning a panic into a `Panicked` failure.
    pub fn catch_unwind(f: impl FnOnce() -> T + UnwindSafe) -> Self {
        match panic::catch_unwind(f) {
            Ok(value) => Try::Success(value),
            Err(payload) => Try::Failure(TryError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Lifts a fallible `A -> T` function into a total `A -> Try<T>` one.
    pub fn lift<A, E>(mut f: impl FnMut(A) -> Result<T, E>) -> impl FnMut(A) -> Try<T>
    where
        E: Into<BoxError>,
    {
        move |a| Try::from_result(f(a))
    }

    /// Lifts a fallible check into a function that passes its input through
    /// on success.
    pub fn consume_catching<E>(mut f: impl FnMut(&T) -> Result<(), E>) -> impl FnMut(T) -> Try<T>
    where
        E: Into<BoxError>,
    {
        move |value| match f(&value) {
            Ok(()) => Try::Success(value),
            Err(e) => Try::failure(e),
        }
    }

    /// Lifts a fallible supplier into a function that ignores its input,
    /// for use with `flat_map` when the next step needs no value.
    pub fn get_catching<A, E>(mut supplier: impl FnMut() -> Result<T, E>) -> impl FnMut(A) -> Try<T>
    where
        E: Into<BoxError>,
    {
        move |_| Try::from_result(supplier())
    }
}

impl Try<()> {
    /// Runs `runnable` now; success carries the unit marker.
    pub fn run_catching<E: Into<BoxError>>(runnable: impl FnOnce() -> Result<(), E>) -> Self {
        Self::of(runnable)
    }
}

// ─── Combinators ──────────────────────────────────────────────────────────────

impl<T> Try<T> {
    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Try::Success(_))
    }

    /// Returns true for `Failure`.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Borrows the success value, if any.
    pub fn success_ref(&self) -> Option<&T> {
        match self {
            Try::Success(value) => Some(value),
            Try::Failure(_) => None,
        }
    }

    /// Borrows the held error, if any.
    pub fn failure_ref(&self) -> Option<&TryError> {
        match self {
            Try::Success(_) => None,
            Try::Failure(error) => Some(error),
        }
    }

    /// Collapses both states into one value.
    pub fn fold<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(TryError) -> R,
    ) -> R {
        match self {
            Try::Success(value) => on_success(value),
            Try::Failure(error) => on_failure(error),
        }
    }

    /// Maps a success value; a failure passes through and `f` is not called.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Try<U> {
        match self {
            Try::Success(value) => Try::Success(f(value)),
            Try::Failure(error) => Try::Failure(error),
        }
    }

    /// Maps a success value with a fallible function. An `Err` from `f`
    /// becomes the new failure.
    pub fn try_map<U, E: Into<BoxError>>(self, f: impl FnOnce(T) -> Result<U, E>) -> Try<U> {
        self.flat_map(|value| Try::from_result(f(value)))
    }

    /// Chains a computation that itself produces a `Try`.
    pub fn flat_map<U>(self, f: impl FnOnce(T) -> Try<U>) -> Try<U> {
        match self {
            Try::Success(value) => f(value),
            Try::Failure(error) => Try::Failure(error),
        }
    }

    /// Turns a success that fails `predicate` into a `PredicateFailed`
    /// failure.
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Try::Success(value) => {
                if predicate(&value) {
                    Try::Success(value)
                } else {
                    Try::Failure(TryError::PredicateFailed)
                }
            }
            failure => failure,
        }
    }

    /// Replaces a failure with a fresh attempt.
    pub fn recover<E: Into<BoxError>>(self, supplier: impl FnOnce() -> Result<T, E>) -> Self {
        match self {
            Try::Failure(_) => Try::of(supplier),
            success => success,
        }
    }

    /// Replaces a failure with a fresh attempt, but only when `predicate`
    /// accepts the held error. Otherwise the original failure is kept.
    pub fn recover_if<E: Into<BoxError>>(
        self,
        supplier: impl FnOnce() -> Result<T, E>,
        predicate: impl FnOnce(&TryError) -> bool,
    ) -> Self {
        match self {
            Try::Failure(error) => {
                if predicate(&error) {
                    Try::of(supplier)
                } else {
                    Try::Failure(error)
                }
            }
            success => success,
        }
    }

    /// Replaces a failure with an attempt computed from the error.
    pub fn recover_with<E: Into<BoxError>>(
        self,
        f: impl FnOnce(TryError) -> Result<T, E>,
    ) -> Self {
        match self {
            Try::Failure(error) => Try::from_result(f(error)),
            success => success,
        }
    }

    /// Runs `consumer` on a success value and returns `self` unchanged.
    pub fn on_success(self, consumer: impl FnOnce(&T)) -> Self {
        if let Try::Success(value) = &self {
            consumer(value);
        }
        self
    }

    /// Like `on_success`, but an `Err` from `consumer` turns the chain into
    /// a failure.
    pub fn try_on_success<E: Into<BoxError>>(
        self,
        consumer: impl FnOnce(&T) -> Result<(), E>,
    ) -> Self {
        match self {
            Try::Success(value) => match consumer(&value) {
                Ok(()) => Try::Success(value),
                Err(e) => Try::failure(e),
            },
            failure => failure,
        }
    }

    /// Runs `consumer` on the held error and returns `self` unchanged.
    pub fn on_failure(self, consumer: impl FnOnce(&TryError)) -> Self {
        if let Try::Failure(error) = &self {
            consumer(error);
        }
        self
    }

    /// Inspects the whole `Try` without altering it.
    pub fn peek(self, consumer: impl FnOnce(&Try<T>)) -> Self {
        consumer(&self);
        self
    }

    /// Like `peek`, but an `Err` from `consumer` becomes a new failure.
    pub fn try_peek<E: Into<BoxError>>(self, consumer: impl FnOnce(&Try<T>) -> Result<(), E>) -> Self {
        match consumer(&self) {
            Ok(()) => self,
            Err(e) => Try::failure(e),
        }
    }

    /// The success value, or a `NotSuccess` error wrapping the failure.
    pub fn get(self) -> Result<T, TryError> {
        match self {
            Try::Success(value) => Ok(value),
            Try::Failure(error) => Err(TryError::NotSuccess(Box::new(error))),
        }
    }

    /// The success value, or the captured error exactly as it was stored.
    pub fn or_else_throw(self) -> Result<T, TryError> {
        self.into()
    }

    /// The success value, discarding a failure.
    pub fn optional(self) -> Option<T> {
        match self {
            Try::Success(value) => Some(value),
            Try::Failure(_) => None,
        }
    }

    /// Iterates over the success value, if any.
    pub fn iter(&self) -> std::option::IntoIter<&T> {
        self.success_ref().into_iter()
    }

    /// Failure on the Left, success on the Right.
    pub fn to_either(self) -> Either<TryError, T> {
        match self {
            Try::Success(value) => Either::Right(value),
            Try::Failure(error) => Either::Left(error),
        }
    }
}

impl<T> IntoIterator for Try<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.optional().into_iter()
    }
}

impl<T> From<Try<T>> for Result<T, TryError> {
    fn from(t: Try<T>) -> Self {
        match t {
            Try::Success(value) => Ok(value),
            Try::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Either<TryError, T>> for Try<T> {
    fn from(either: Either<TryError, T>) -> Self {
        either.fold(Try::Failure, Try::Success)
    }
}
