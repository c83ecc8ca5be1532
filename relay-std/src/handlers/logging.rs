//! Logging handler for event observation.

use crate::macros::log_info;
use relay_core::{BoxError, Event, EventHandle, Handler};
use std::fmt::Debug;

/// A handler that logs every event it sees and never holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl<E: Event + Debug> Handler<E> for LoggingHandler {
    fn handle(&self, event: &EventHandle<E>) -> Result<(), BoxError> {
        log_info!(name = event.event_name(), event = ?event.event(), "Processing event");
        #[cfg(not(feature = "tracing"))]
        {
            let _ = event; // Suppress unused warning
        }
        Ok(())
    }
}
