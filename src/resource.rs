//! Release seam for values held by a `Try` or an `Either`.
//!
//! [`Closeable`] is the operation `Try::close` and `Either::close` delegate
//! to. [`Resource`] pairs any value with a release function and guarantees
//! that function runs at most once, either through an explicit `close` or on
//! drop.

use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use crate::error::BoxError;

/// A value that owns something which must be released.
pub trait Closeable {
    /// Releases the held resource.
    fn close(&mut self) -> Result<(), BoxError>;
}

impl<C: Closeable + ?Sized> Closeable for Box<C> {
    fn close(&mut self) -> Result<(), BoxError> {
        (**self).close()
    }
}

type Release<R> = Box<dyn FnOnce(&mut R) -> Result<(), BoxError> + Send>;

/// A value with a release function that runs exactly once.
///
/// Closing twice is a no-op the second time. A resource that is dropped
/// without being closed is released on drop; errors from that release have
/// nowhere to go and are only logged at debug level.
pub struct Resource<R> {
    value: R,
    release: Option<Release<R>>,
}

impl<R> Resource<R> {
    /// Wraps `value`, to be released by `release`.
    pub fn new<F, E>(value: R, release: F) -> Self
    where
        F: FnOnce(&mut R) -> Result<(), E> + Send + 'static,
        E: Into<BoxError>,
    {
        let release: Release<R> =
            Box::new(move |v: &mut R| -> Result<(), BoxError> { release(v).map_err(Into::into) });
        Self {
            value,
            release: Some(release),
        }
    }

    /// Returns true once the release function has run.
    pub fn is_closed(&self) -> bool {
        self.release.is_none()
    }
}

impl<R> Closeable for Resource<R> {
    fn close(&mut self) -> Result<(), BoxError> {
        match self.release.take() {
            Some(release) => {
                trace!("releasing resource");
                release(&mut self.value)
            }
            None => Ok(()),
        }
    }
}

impl<R> Drop for Resource<R> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            if let Err(error) = release(&mut self.value) {
                debug!(%error, "resource release on drop failed");
            }
        }
    }
}

impl<R> Deref for Resource<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.value
    }
}

impl<R> DerefMut for Resource<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.value
    }
}

impl<R: fmt::Debug> fmt::Debug for Resource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("value", &self.value)
            .field("closed", &self.is_closed())
            .finish()
    }
}
