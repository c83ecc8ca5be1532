//! # Handler provider
//!
//! The seam between the dispatch engine and whatever keeps track of
//! registered handlers. The engine consults the provider exactly once per
//! dispatch, when the dispatch starts, and never mutates what it returns.

use crate::{
    error::BoxError,
    event::Event,
    registration::{Registration, Tier},
};
use std::sync::Arc;

/// A source of handler registrations for an event type.
///
/// Implementations must return the same answer for the duration of one
/// dispatch; the engine snapshots it, so later registry mutations do not
/// affect an in-flight dispatch anyway.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid HandlerProvider for `{E}`",
    label = "missing `HandlerProvider` implementation",
    note = "Implement `HandlerProvider<{E}>` to allow resolving handlers for this event type."
)]
pub trait HandlerProvider<E: Event>: Send + Sync {
    /// Resolve the ordered handler sequence for the given event.
    fn handlers_for(&self, event: &E) -> Result<Vec<Registration<E>>, BoxError>;

    /// Resolve the handlers grouped into priority tiers.
    ///
    /// The default groups [`handlers_for`](Self::handlers_for) by priority,
    /// which assumes that sequence is already sorted by priority.
    fn tiers_for(&self, event: &E) -> Result<Vec<Tier<E>>, BoxError> {
        Ok(Tier::group(self.handlers_for(event)?))
    }
}

impl<E: Event> HandlerProvider<E> for Vec<Registration<E>> {
    fn handlers_for(&self, _event: &E) -> Result<Vec<Registration<E>>, BoxError> {
        Ok(self.iter().filter(|r| r.is_enabled()).cloned().collect())
    }
}

impl<E: Event, P: HandlerProvider<E> + ?Sized> HandlerProvider<E> for Arc<P> {
    fn handlers_for(&self, event: &E) -> Result<Vec<Registration<E>>, BoxError> {
        (**self).handlers_for(event)
    }

    fn tiers_for(&self, event: &E) -> Result<Vec<Tier<E>>, BoxError> {
        (**self).tiers_for(event)
    }
}
