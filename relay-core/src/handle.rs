//! # Handler-side view of a dispatch
//!
//! Handlers never see the dispatch state machine itself. They receive an
//! [`EventHandle`]: a cheap, cloneable, `'static` reference to the occurrence
//! being dispatched that exposes the event payload and the hold/resume
//! controls.
//!
//! A handler that needs to finish work out-of-band clones the handle, calls
//! [`EventHandle::hold`], returns, and later calls [`EventHandle::resume`]
//! from wherever the work completes (another task, another thread, a timer).

use crate::{error::DispatchError, event::Event};
use std::{fmt, ops::Deref, sync::Arc};

/// Object-safe access to an in-flight dispatch.
///
/// Implemented by the dispatch engine; handler code uses [`EventHandle`].
pub trait Occurrence<E: Event>: Send + Sync {
    /// The event payload.
    fn event(&self) -> &E;

    /// Name of the event used in diagnostics.
    fn event_name(&self) -> &'static str;

    /// Asks the pipeline not to advance past the current step.
    fn hold(&self) -> Result<(), DispatchError>;

    /// Releases a hold, advancing the pipeline when nothing else holds it.
    fn resume(&self) -> Result<(), DispatchError>;
}

/// A cloneable reference to an event being dispatched.
///
/// Dereferences to the event payload.
pub struct EventHandle<E: Event> {
    inner: Arc<dyn Occurrence<E>>,
}

impl<E: Event> EventHandle<E> {
    /// Wrap an occurrence.
    pub fn new(inner: Arc<dyn Occurrence<E>>) -> Self {
        Self { inner }
    }

    /// The event payload.
    pub fn event(&self) -> &E {
        self.inner.event()
    }

    /// Name of the event used in diagnostics.
    pub fn event_name(&self) -> &'static str {
        self.inner.event_name()
    }

    /// Holds the pipeline until a matching [`resume`](Self::resume).
    #[doc(alias = "block")]
    pub fn hold(&self) -> Result<(), DispatchError> {
        self.inner.hold()
    }

    /// Releases a hold previously taken with [`hold`](Self::hold).
    #[doc(alias = "release")]
    pub fn resume(&self) -> Result<(), DispatchError> {
        self.inner.resume()
    }

    /// Holds the pipeline and returns a guard that resumes it when dropped.
    ///
    /// The guard can be moved into whatever completes the out-of-band work;
    /// the pipeline resumes even if that work bails out early.
    pub fn hold_guard(&self) -> Result<HoldGuard<E>, DispatchError> {
        self.hold()?;
        Ok(HoldGuard {
            handle: Some(self.clone()),
        })
    }
}

impl<E: Event> Clone for EventHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Event> Deref for EventHandle<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        self.event()
    }
}

impl<E: Event> fmt::Debug for EventHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandle")
            .field("event", &self.event_name())
            .finish()
    }
}

/// A hold that is released when the guard goes out of scope.
///
/// Created by [`EventHandle::hold_guard`]. Errors from the implicit resume in
/// `Drop` are discarded; call [`release`](Self::release) to observe them.
#[must_use = "dropping the guard resumes the pipeline immediately"]
pub struct HoldGuard<E: Event> {
    handle: Option<EventHandle<E>>,
}

impl<E: Event> HoldGuard<E> {
    /// The handle this guard holds.
    pub fn handle(&self) -> Option<&EventHandle<E>> {
        self.handle.as_ref()
    }

    /// Resumes the pipeline now.
    pub fn release(mut self) -> Result<(), DispatchError> {
        match self.handle.take() {
            Some(handle) => handle.resume(),
            None => Ok(()),
        }
    }
}

impl<E: Event> Drop for HoldGuard<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.resume();
        }
    }
}

impl<E: Event> fmt::Debug for HoldGuard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoldGuard")
            .field("released", &self.handle.is_none())
            .finish()
    }
}
