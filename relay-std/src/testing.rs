//! Testing utilities for Relay.
//!
//! This module provides handlers that make dispatch behaviour observable.
//!
//! # Features
//!
//! - [`Journal`]: A shared, ordered log of handler invocations
//! - [`RecordingHandler`]: Writes its label to a journal
//! - [`HoldingHandler`]: Writes its label, holds the dispatch and parks the
//!   handle so the test decides when to resume
//! - [`CountingHandler`]: Counts invocations
//! - [`FailingHandler`]: Writes its label and returns an error

use relay_core::{BoxError, DispatchError, Event, EventHandle, Handler};
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Journal
// ============================================================================

/// An ordered, shared log of labels.
///
/// # Example
///
/// ```rust,ignore
/// let journal = Journal::new();
/// let registry = RegistryBuilder::new()
///     .register(RecordingHandler::new("a", &journal))
///     .register(RecordingHandler::new("b", &journal))
///     .build();
///
/// SequentialEvent::new(MyEvent, Arc::new(registry)).call()?;
/// assert_eq!(journal.entries(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        lock(&self.entries).push(entry.into());
    }

    /// Get a copy of the entries.
    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records its label and lets the dispatch continue.
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    label: String,
    journal: Journal,
}

impl RecordingHandler {
    /// Create a recording handler writing to `journal`.
    pub fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: journal.clone(),
        }
    }
}

impl<E: Event> Handler<E> for RecordingHandler {
    fn handle(&self, _event: &EventHandle<E>) -> Result<(), BoxError> {
        self.journal.push(self.label.clone());
        Ok(())
    }
}

// ============================================================================
// Holding Handler
// ============================================================================

/// A handler that holds the dispatch and parks its handle.
///
/// Clones share the parked handles, so keep a clone to resume from the test.
///
/// # Example
///
/// ```rust,ignore
/// let waiter = HoldingHandler::new("wait", &journal);
/// let registry = RegistryBuilder::new().register(waiter.clone()).build();
///
/// event.call()?;
/// assert_eq!(event.phase(), Phase::Blocked);
/// waiter.resume_next().unwrap()?;
/// ```
pub struct HoldingHandler<E: Event> {
    label: String,
    journal: Journal,
    holds: usize,
    parked: Arc<Mutex<VecDeque<EventHandle<E>>>>,
}

impl<E: Event> HoldingHandler<E> {
    /// Create a handler that holds once per invocation.
    pub fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: journal.clone(),
            holds: 1,
            parked: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Hold `holds` times per invocation; the handle is parked once per hold.
    pub fn with_holds(mut self, holds: usize) -> Self {
        self.holds = holds;
        self
    }

    /// Number of parked handles.
    pub fn parked(&self) -> usize {
        lock(&self.parked).len()
    }

    /// Take the oldest parked handle.
    pub fn take_parked(&self) -> Option<EventHandle<E>> {
        lock(&self.parked).pop_front()
    }

    /// Resume through the oldest parked handle.
    ///
    /// Returns `None` when nothing is parked.
    pub fn resume_next(&self) -> Option<Result<(), DispatchError>> {
        // Resuming runs further handlers, possibly this one again.
        let handle = self.take_parked()?;
        Some(handle.resume())
    }
}

impl<E: Event> Clone for HoldingHandler<E> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            journal: self.journal.clone(),
            holds: self.holds,
            parked: self.parked.clone(),
        }
    }
}

impl<E: Event> Handler<E> for HoldingHandler<E> {
    fn handle(&self, event: &EventHandle<E>) -> Result<(), BoxError> {
        self.journal.push(self.label.clone());
        for _ in 0..self.holds {
            event.hold()?;
            lock(&self.parked).push_back(event.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<E: Event> Handler<E> for CountingHandler {
    fn handle(&self, _event: &EventHandle<E>) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that records its label and then fails.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    label: String,
    journal: Journal,
}

impl FailingHandler {
    /// Create a failing handler writing to `journal`.
    pub fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: journal.clone(),
        }
    }
}

impl<E: Event> Handler<E> for FailingHandler {
    fn handle(&self, _event: &EventHandle<E>) -> Result<(), BoxError> {
        self.journal.push(self.label.clone());
        Err(format!("{} failed on purpose", self.label).into())
    }
}
