//! One-off validation of a single value.
//!
//! Where [`Validation`](super::Validation) is a reusable rule set,
//! `Validator` checks one value in place and collects errors as it goes.

use crate::either::Either;

/// Accumulates validation errors for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator<T, E> {
    value: T,
    errors: Vec<E>,
}

impl<T, E> Validator<T, E> {
    /// Starts validating `value` with no errors.
    pub fn of(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    /// Records `error` unless `predicate` holds for the value.
    pub fn validate(self, predicate: impl FnOnce(&T) -> bool, error: E) -> Self {
        self.validate_with(predicate, |_| error)
    }

    /// Records an error built from the value unless `predicate` holds.
    pub fn validate_with(
        mut self,
        predicate: impl FnOnce(&T) -> bool,
        error_fn: impl FnOnce(&T) -> E,
    ) -> Self {
        if !predicate(&self.value) {
            let error = error_fn(&self.value);
            self.errors.push(error);
        }
        self
    }

    /// Validates a part of the value selected by `mapper`.
    pub fn validate_field<R: ?Sized>(
        self,
        mapper: impl FnOnce(&T) -> &R,
        predicate: impl FnOnce(&R) -> bool,
        error: E,
    ) -> Self {
        self.validate_with(|v| predicate(mapper(v)), |_| error)
    }

    /// Records `error` if the optional part selected by `mapper` is absent.
    pub fn require_some<R>(self, mapper: impl FnOnce(&T) -> Option<&R>, error: E) -> Self {
        self.validate_with(|v| mapper(v).is_some(), |_| error)
    }

    /// Runs a check that reports its own error.
    pub fn check(mut self, checker: impl FnOnce(&T) -> Option<E>) -> Self {
        if let Some(error) = checker(&self.value) {
            self.errors.push(error);
        }
        self
    }

    /// Returns true if any check failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The errors so far, in check order.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Consumes the validator, keeping only the errors.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    /// The value on the Right if no check failed, the errors on the Left
    /// otherwise.
    pub fn into_either(self) -> Either<Vec<E>, T> {
        if self.errors.is_empty() {
            Either::Right(self.value)
        } else {
            Either::Left(self.errors)
        }
    }
}
