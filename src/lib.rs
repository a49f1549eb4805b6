//! Lifted - values for computations that may fail.
//!
//! - [`Either`] holds one of two alternatives, by convention an error on the
//!   Left and a result on the Right.
//! - [`Try`] captures the outcome of a fallible computation so that further
//!   steps can be chained, recovered and released without early returns.
//! - [`Validation`] is a frozen, shareable set of rules that reports every
//!   violated rule for an input.
//!
//! Supporting modules provide scoped resource release ([`resource`]),
//! retrying with backoff ([`retry`]), lifting of partial functions
//! ([`lift`]) and memoization ([`memo`]).

pub mod either;
pub mod error;
pub mod fallible;
pub mod lift;
pub mod memo;
pub mod resource;
pub mod retry;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use either::Either;
pub use error::{BoxError, TryError};
pub use fallible::Try;
pub use memo::Memo;
pub use resource::{Closeable, Resource};
pub use retry::{Backoff, Retry, RetryConfig, RetryResult};
pub use validation::{Builder, Validation, Validator};
