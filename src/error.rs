//! Captured error type for lifted computations.
//!
//! Every error returned by a closure lifted into a [`Try`](crate::Try) or
//! caught by [`Either::catching`](crate::Either::catching) is stored as a
//! [`TryError`]. The original error stays reachable through
//! [`TryError::downcast_ref`], so a terminal call can hand back exactly what
//! the lifted code produced.

use std::error::Error as StdError;

use thiserror::Error;

/// A boxed, thread-safe error as returned by arbitrary lifted code.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error captured by a failed computation.
#[derive(Debug, Error)]
pub enum TryError {
    /// An error returned by lifted code.
    #[error(transparent)]
    Raised(BoxError),

    /// A success value was rejected by `filter`.
    #[error("predicate does not hold for the success value")]
    PredicateFailed,

    /// A value was requested from a failed computation.
    #[error("value requested from a failed computation: {0}")]
    NotSuccess(#[source] Box<TryError>),

    /// Lifted code panicked.
    #[error("computation panicked: {0}")]
    Panicked(String),

    /// A primary failure with a secondary failure attached to it, e.g. from a
    /// finally block or a resource release that ran after the primary error.
    #[error("{primary} (suppressed: {suppressed})")]
    Suppressed {
        #[source]
        primary: Box<TryError>,
        suppressed: Box<TryError>,
    },
}

impl TryError {
    /// Wraps any error.
    ///
    /// Passing an already boxed `TryError` returns it unchanged rather than
    /// nesting it inside `Raised`.
    pub fn new(error: impl Into<BoxError>) -> Self {
        let boxed: BoxError = error.into();
        match boxed.downcast::<TryError>() {
            Ok(own) => *own,
            Err(other) => TryError::Raised(other),
        }
    }

    /// Attaches `suppressed` to `self`, keeping `self` as the primary error.
    pub fn with_suppressed(self, suppressed: TryError) -> Self {
        TryError::Suppressed {
            primary: Box::new(self),
            suppressed: Box::new(suppressed),
        }
    }

    /// The error that caused this one, looking through the wrappers this
    /// crate adds (`NotSuccess` and the primary side of `Suppressed`).
    pub fn primary(&self) -> &TryError {
        match self {
            TryError::NotSuccess(cause) => cause.primary(),
            TryError::Suppressed { primary, .. } => primary.primary(),
            other => other,
        }
    }

    /// The secondary error attached by `with_suppressed`, if any.
    pub fn suppressed(&self) -> Option<&TryError> {
        match self {
            TryError::Suppressed { suppressed, .. } => Some(suppressed),
            _ => None,
        }
    }

    /// Returns the originally raised error if it has type `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self.primary() {
            TryError::Raised(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns true if the originally raised error has type `E`.
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }
}

/// Extracts a printable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
