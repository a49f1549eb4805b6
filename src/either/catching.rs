//! Lifting fallible closures into `Either`.

use super::Either;
use crate::error::{BoxError, TryError};

impl<R> Either<TryError, R> {
    /// Runs `supplier` now, capturing an error on the Left.
    pub fn catching<E>(supplier: impl FnOnce() -> Result<R, E>) -> Self
    where
        E: Into<BoxError>,
    {
        match supplier() {
            Ok(r) => Either::Right(r),
            Err(e) => Either::Left(TryError::new(e)),
        }
    }

    /// Lifts a fallible `T -> R` function into a total `T -> Either` one.
    ///
    /// Handy with `flat_map`:
    ///
    /// ```
    /// use lifted::Either;
    ///
    /// let parsed = Either::catching(|| Ok::<_, std::num::ParseIntError>("12"))
    ///     .flat_map(Either::catching_fn(str::parse::<i32>));
    /// assert_eq!(parsed.optional(), Some(12));
    /// ```
    pub fn catching_fn<T, E>(
        mut f: impl FnMut(T) -> Result<R, E>,
    ) -> impl FnMut(T) -> Either<TryError, R>
    where
        E: Into<BoxError>,
    {
        move |t| Either::catching(|| f(t))
    }

    /// Lifts a fallible consumer into a function that passes its input
    /// through on the Right.
    pub fn catching_consumer<E>(
        mut f: impl FnMut(&R) -> Result<(), E>,
    ) -> impl FnMut(R) -> Either<TryError, R>
    where
        E: Into<BoxError>,
    {
        move |r| match f(&r) {
            Ok(()) => Either::Right(r),
            Err(e) => Either::Left(TryError::new(e)),
        }
    }
}
