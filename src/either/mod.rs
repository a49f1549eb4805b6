//! Right-biased disjoint union.
//!
//! `Either` has no getters on purpose: collapse it with [`Either::fold`],
//! project it with [`Either::optional`] or iterate it. All combinators work
//! on the Right side and pass a Left through untouched; use
//! [`Either::swap`] to operate on the Left side instead.
//!
//! Callbacks given to `map`, `flat_map` and `filter` are not guarded: a
//! panic inside them propagates to the caller. To turn a fallible closure
//! into an `Either`, use the [`catching`](Either::catching) family.

use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::resource::Closeable;

mod catching;

/// A value that is exactly one of `Left(L)` or `Right(R)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Either<L, R> {
    /// The failure-like or alternate side.
    Left(L),
    /// The success-like or primary side.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Builds a Left.
    pub fn left(value: L) -> Self {
        Either::Left(value)
    }

    /// Builds a Right.
    pub fn right(value: R) -> Self {
        Either::Right(value)
    }

    /// Returns true for a Left.
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Returns true for a Right.
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Collapses both sides into one value.
    pub fn fold<T>(self, on_left: impl FnOnce(L) -> T, on_right: impl FnOnce(R) -> T) -> T {
        match self {
            Either::Left(l) => on_left(l),
            Either::Right(r) => on_right(r),
        }
    }

    /// Maps the Right value.
    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> Either<L, T> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(f(r)),
        }
    }

    /// Maps the Left value.
    pub fn map_left<U>(self, f: impl FnOnce(L) -> U) -> Either<U, R> {
        match self {
            Either::Left(l) => Either::Left(f(l)),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Maps the Right value to another `Either` and flattens the result.
    ///
    /// `f` is never called for a Left.
    pub fn flat_map<T>(self, f: impl FnOnce(R) -> Either<L, T>) -> Either<L, T> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => f(r),
        }
    }

    /// Turns a Right that fails `predicate` into a Left built by `else_fn`.
    pub fn filter(
        self,
        predicate: impl FnOnce(&R) -> bool,
        else_fn: impl FnOnce(R) -> L,
    ) -> Either<L, R> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => {
                if predicate(&r) {
                    Either::Right(r)
                } else {
                    Either::Left(else_fn(r))
                }
            }
        }
    }

    /// Like `filter`, but a rejected Right stays on the Right as `None`.
    pub fn filter_optional(self, predicate: impl FnOnce(&R) -> bool) -> Either<L, Option<R>> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(Some(r).filter(predicate)),
        }
    }

    /// Exchanges the two sides.
    pub fn swap(self) -> Either<R, L> {
        match self {
            Either::Left(l) => Either::Right(l),
            Either::Right(r) => Either::Left(r),
        }
    }

    /// Runs the side effect for whichever side is present.
    pub fn accept(self, on_left: impl FnOnce(&L), on_right: impl FnOnce(&R)) -> Self {
        match &self {
            Either::Left(l) => on_left(l),
            Either::Right(r) => on_right(r),
        }
        self
    }

    /// The Right value, discarding a Left.
    pub fn optional(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }

    /// Iterates over the Right value, if any.
    pub fn iter(&self) -> std::option::IntoIter<&R> {
        self.as_ref().optional().into_iter()
    }

    /// Borrows whichever side is present.
    pub fn as_ref(&self) -> Either<&L, &R> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Right becomes `Ok`, Left becomes `Err`.
    pub fn into_result(self) -> Result<R, L> {
        self.into()
    }
}

impl<L, R> IntoIterator for Either<L, R> {
    type Item = R;
    type IntoIter = std::option::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.optional().into_iter()
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(r) => Either::Right(r),
            Err(l) => Either::Left(l),
        }
    }
}

impl<L, R> From<Either<L, R>> for Result<R, L> {
    fn from(either: Either<L, R>) -> Self {
        match either {
            Either::Left(l) => Err(l),
            Either::Right(r) => Ok(r),
        }
    }
}

impl<L: Closeable, R: Closeable> Either<L, R> {
    /// Releases whichever side is present.
    pub fn close(&mut self) -> Result<(), BoxError> {
        match self {
            Either::Left(l) => l.close(),
            Either::Right(r) => r.close(),
        }
    }
}
