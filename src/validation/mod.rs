//! Reusable, frozen rule sets.
//!
//! A [`Validation`] is assembled once through a [`Builder`] and then applied
//! to any number of inputs. Each rule pairs a predicate stating when the
//! input is *valid* with the error to report when it is not. Rules run in
//! insertion order and every failing rule contributes its error; use
//! [`Validation::first_error`] for fail-fast evaluation.
//!
//! `build` consumes the builder, so a built `Validation` can no longer gain
//! rules. It is cheap to clone and safe to share between threads.

use std::fmt;
use std::sync::Arc;

use crate::either::Either;

mod validator;

pub use validator::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    All,
    First,
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type ErrorFn<T, E> = Box<dyn Fn(&T) -> E + Send + Sync>;
type Nested<T, E> = Box<dyn Fn(&T, Mode, &mut Vec<E>) + Send + Sync>;

enum Rule<T, E> {
    Check {
        predicate: Predicate<T>,
        error: ErrorFn<T, E>,
    },
    Nested(Nested<T, E>),
}

/// An immutable, ordered set of validation rules for `T` reporting `E`.
pub struct Validation<T, E> {
    rules: Arc<[Rule<T, E>]>,
}

impl<T, E> Validation<T, E> {
    /// Starts an empty rule set.
    pub fn builder() -> Builder<T, E> {
        Builder { rules: Vec::new() }
    }

    /// Applies every rule and returns all errors, in rule order.
    ///
    /// An empty vector means the input is valid.
    pub fn validate(&self, value: &T) -> Vec<E> {
        let mut errors = Vec::new();
        self.collect(value, Mode::All, &mut errors);
        errors
    }

    /// Applies rules in order and stops at the first failing one.
    pub fn first_error(&self, value: &T) -> Option<E> {
        let mut errors = Vec::with_capacity(1);
        self.collect(value, Mode::First, &mut errors);
        errors.pop()
    }

    /// Returns true if no rule fails.
    pub fn is_valid(&self, value: &T) -> bool {
        self.first_error(value).is_none()
    }

    /// Returns the input on the Right when it is valid, otherwise all
    /// errors on the Left.
    pub fn validate_to_either(&self, value: T) -> Either<Vec<E>, T> {
        let errors = self.validate(&value);
        if errors.is_empty() {
            Either::Right(value)
        } else {
            Either::Left(errors)
        }
    }

    /// Number of top-level rules; a nested validation counts as one.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn collect(&self, value: &T, mode: Mode, errors: &mut Vec<E>) {
        for rule in self.rules.iter() {
            match rule {
                Rule::Check { predicate, error } => {
                    if !predicate(value) {
                        errors.push(error(value));
                    }
                }
                Rule::Nested(nested) => nested(value, mode, errors),
            }
            if mode == Mode::First && !errors.is_empty() {
                return;
            }
        }
    }
}

impl<T, E> Clone for Validation<T, E> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<T, E> fmt::Debug for Validation<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Collects rules for a [`Validation`].
pub struct Builder<T, E> {
    rules: Vec<Rule<T, E>>,
}

impl<T, E> Builder<T, E> {
    /// Adds a rule reporting a fixed `error` when `predicate` is false.
    pub fn add_validation<P>(self, predicate: P, error: E) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        self.add_validation_with(predicate, move |_| error.clone())
    }

    /// Adds a rule whose error is computed from the rejected input.
    pub fn add_validation_with<P, F>(mut self, predicate: P, error_fn: F) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        F: Fn(&T) -> E + Send + Sync + 'static,
    {
        self.rules.push(Rule::Check {
            predicate: Box::new(predicate),
            error: Box::new(error_fn),
        });
        self
    }

    /// Validates a part of the input, derived by `extractor`, with another
    /// validation. Its errors are reported at this rule's position.
    pub fn add_nested<R, X>(mut self, extractor: X, nested: Validation<R, E>) -> Self
    where
        X: Fn(&T) -> R + Send + Sync + 'static,
        R: 'static,
        E: 'static,
    {
        self.rules.push(Rule::Nested(Box::new(
            move |value: &T, mode: Mode, errors: &mut Vec<E>| {
                nested.collect(&extractor(value), mode, errors)
            },
        )));
        self
    }

    /// Freezes the rules into a `Validation`.
    pub fn build(self) -> Validation<T, E> {
        Validation {
            rules: self.rules.into(),
        }
    }
}

impl<T, E> fmt::Debug for Builder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("rules", &self.rules.len())
            .finish()
    }
}
