//! Process-wide lazily constructed resources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Holder for a heavy resource that is built at most once per process.
///
/// The first caller constructs the value while holding the lock, so concurrent
/// first use runs the constructor exactly once. Every caller observes the same
/// `Arc<T>` until [`SharedResource::reset`]. A failed construction leaves the
/// slot empty and the next caller tries again.
pub struct SharedResource<T> {
    slot: Mutex<Option<Arc<T>>>,
    inits: AtomicUsize,
}

impl<T> SharedResource<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            inits: AtomicUsize::new(0),
        }
    }

    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<T, E>) -> Result<Arc<T>, E> {
        let mut guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = guard.as_ref() {
            return Ok(value.clone());
        }
        let value = Arc::new(init()?);
        self.inits.fetch_add(1, Ordering::Relaxed);
        *guard = Some(value.clone());
        Ok(value)
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop the cached instance; the next access constructs a fresh one.
    pub fn reset(&self) -> Option<Arc<T>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Number of successful constructions so far.
    pub fn init_count(&self) -> usize {
        self.inits.load(Ordering::Relaxed)
    }
}

impl<T> Default for SharedResource<T> {
    fn default() -> Self {
        Self::new()
    }
}
