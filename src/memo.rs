//! Memoization of pure functions.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

/// Caches the results of a pure function `F: Fn(&K) -> V`.
///
/// The function runs outside the cache lock, so it may itself consult the
/// same `Memo` (recursive definitions) without deadlocking. Two threads
/// missing on the same key at once may both compute it; the first value
/// stored wins and both callers get that value.
pub struct Memo<K, V, F> {
    func: F,
    cache: Mutex<HashMap<K, V>>,
}

impl<K, V, F> Memo<K, V, F>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K) -> V,
{
    /// Wraps `func` with an empty cache.
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, computing it on first use.
    pub fn get(&self, key: K) -> V {
        if let Some(value) = self.lock().get(&key) {
            return value.clone();
        }

        trace!("memo cache miss");
        let value = (self.func)(&key);
        self.lock().entry(key).or_insert(value).clone()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forgets every cached value.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic in `func` never happens under the lock, so a poisoned cache
    // still holds consistent entries.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V, F> fmt::Debug for Memo<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.cache.lock().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("Memo").field("cached", &cached).finish_non_exhaustive()
    }
}
