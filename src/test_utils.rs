//! Shared test utilities and arbitrary generators for property-based testing.

use std::fmt;

use proptest::prelude::*;

use crate::either::Either;

/// Error returned by [`checked_div`], standing in for an arithmetic fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticError;

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arithmetic error")
    }
}

impl std::error::Error for ArithmeticError {}

/// Integer division that reports division by zero and overflow as an error.
pub fn checked_div(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_div(b).ok_or(ArithmeticError)
}

pub fn arb_either() -> impl Strategy<Value = Either<String, i64>> {
    prop_oneof![
        "[a-z]{0,12}".prop_map(Either::Left),
        any::<i64>().prop_map(Either::Right),
    ]
}

/// Outcomes of a fallible computation, to be lifted with `Try::from_result`.
pub fn arb_outcome() -> impl Strategy<Value = Result<i64, String>> {
    prop_oneof![
        any::<i64>().prop_map(Ok),
        "[a-z ]{1,20}".prop_map(Err),
    ]
}
