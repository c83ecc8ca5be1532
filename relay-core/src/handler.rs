//! # Handler
//!
//! The unit of handling logic registered for an event type.
//!
//! Invocation is synchronous: `handle` runs to completion on the caller's
//! stack. A handler that has to wait for something calls
//! [`EventHandle::hold`] before returning and [`EventHandle::resume`] once the
//! work is done; the dispatch engine takes care of the rest.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|event: &EventHandle<MyEvent>| { ...; Ok(()) }`
//! 2. **Struct implementation**: `impl Handler<MyEvent> for MyHandler`
//! 3. **Attribute macro**: `#[relay::handler(priority = -10, owner = "chat")]`

use crate::{error::BoxError, event::Event, handle::EventHandle};

/// A registered unit of handling logic for events of type `E`.
///
/// Returned errors are reported by the engine with the registration's owner
/// and do not stop the dispatch.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle events of type `{E}`",
    label = "missing `Handler<{E}>` implementation",
    note = "Handlers must implement `handle` for the event type `{E}`."
)]
pub trait Handler<E: Event>: Send + Sync + 'static {
    /// Handles one occurrence of the event.
    fn handle(&self, event: &EventHandle<E>) -> Result<(), BoxError>;
}

// Blanket impl for closures
impl<E, F> Handler<E> for F
where
    E: Event,
    F: Fn(&EventHandle<E>) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn handle(&self, event: &EventHandle<E>) -> Result<(), BoxError> {
        (self)(event)
    }
}
