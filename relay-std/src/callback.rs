//! Completion callback holder.

use std::fmt;
use thiserror::Error;

/// A completion callback receiving the dispatched event.
pub type Callback<E> = Box<dyn FnOnce(&E) + Send + 'static>;

/// Returned by [`CallbackHolder::set`] once the holder has fired.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("completion callback already fired")]
pub struct AlreadyFired;

/// Stores at most one completion callback and fires it exactly once.
pub struct CallbackHolder<E> {
    slot: Option<Callback<E>>,
    fired: bool,
}

impl<E> CallbackHolder<E> {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self {
            slot: None,
            fired: false,
        }
    }

    /// Store a callback, replacing any previous one.
    ///
    /// Rejected (and dropped) once the holder has fired.
    pub fn set(&mut self, callback: Callback<E>) -> Result<(), AlreadyFired> {
        if self.fired {
            return Err(AlreadyFired);
        }
        self.slot = Some(callback);
        Ok(())
    }

    /// Detach the callback for invocation and mark the holder fired.
    ///
    /// Lets the caller release its locks before running user code.
    pub fn take(&mut self) -> Option<Callback<E>> {
        self.fired = true;
        self.slot.take()
    }

    /// Invoke the stored callback, if any, and clear it.
    ///
    /// Returns whether a callback ran. A second call never runs anything.
    ///
    /// The dispatch engine uses [`take`](Self::take) instead, so the callback
    /// runs after the dispatch state is unlocked; `fire` is for holders that
    /// are not shared behind a lock.
    pub fn fire(&mut self, event: &E) -> bool {
        match self.take() {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }

    /// Whether a callback is waiting to fire.
    pub fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether the holder has fired.
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

impl<E> Default for CallbackHolder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for CallbackHolder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHolder")
            .field("set", &self.is_set())
            .field("fired", &self.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn counting(count: &Arc<AtomicUsize>) -> Callback<u32> {
        let count = count.clone();
        Box::new(move |value: &u32| {
            count.fetch_add(*value as usize, Ordering::SeqCst);
        })
    }

    #[test]
    fn fire_is_idempotent() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut holder = CallbackHolder::new();
        holder.set(counting(&count)).unwrap();

        assert!(holder.fire(&1));
        assert!(!holder.fire(&1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fire_without_callback_is_a_noop() {
        let mut holder = CallbackHolder::<u32>::new();
        assert!(!holder.fire(&7));
        assert!(holder.has_fired());
    }

    #[test]
    fn last_write_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut holder = CallbackHolder::new();
        holder.set(counting(&first)).unwrap();
        holder.set(counting(&second)).unwrap();

        holder.fire(&3);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn set_after_fire_is_rejected() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut holder = CallbackHolder::new();
        holder.fire(&0);

        assert_eq!(holder.set(counting(&count)), Err(AlreadyFired));
        assert!(!holder.is_set());
        holder.fire(&5);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
