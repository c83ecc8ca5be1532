//! Error types for Relay.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RelayError`] - Top-level error type for all Relay operations
//! - [`DispatchError`] - Misuse or failure of an event dispatch
//! - [`ProviderError`] - Failures while resolving handlers

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// An error occurred during event dispatch.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Handlers could not be resolved.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A handler returned an error; the dispatch went on without it.
    #[error("handler of `{owner}` failed: {source}")]
    Handler {
        /// Owner of the failing registration.
        owner: String,
        /// The error returned by the handler.
        #[source]
        source: BoxError,
    },
}

/// Errors raised by the dispatch state machine.
///
/// Every variant carries the name of the event whose dispatch was misused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The dispatch was torn down before every handler had run.
    #[error(
        "{event} never finished handling all handlers. \
         Got stuck at a handler of: {}. \
         (Probably a forgotten call of the event's resume() method.)",
        owners.join(", ")
    )]
    StuckPipeline {
        /// Name of the event type.
        event: &'static str,
        /// Owners of the registrations at the stalled position.
        owners: Vec<String>,
    },

    /// `resume()` was called without an outstanding `hold()`.
    #[error("resume() called on {event} without an outstanding hold")]
    InvalidResume {
        /// Name of the event type.
        event: &'static str,
    },

    /// `hold()` was called while the current handler already holds the
    /// pipeline.
    #[error("hold() called on {event} while a hold is already outstanding")]
    AlreadyHeld {
        /// Name of the event type.
        event: &'static str,
    },

    /// The dispatch has not been started with `call()` yet.
    #[error("{event} has not been dispatched yet")]
    NotStarted {
        /// Name of the event type.
        event: &'static str,
    },

    /// `call()` was invoked on a dispatch that already started.
    #[error("{event} has already been dispatched")]
    AlreadyStarted {
        /// Name of the event type.
        event: &'static str,
    },

    /// The dispatch has already completed.
    #[error("{event} has already completed")]
    Completed {
        /// Name of the event type.
        event: &'static str,
    },

    /// The dispatch was torn down unfinished and no longer advances.
    #[error("{event} was abandoned before every handler ran")]
    Abandoned {
        /// Name of the event type.
        event: &'static str,
    },
}

impl DispatchError {
    /// Name of the event this error refers to.
    pub fn event(&self) -> &'static str {
        match self {
            DispatchError::StuckPipeline { event, .. }
            | DispatchError::InvalidResume { event }
            | DispatchError::AlreadyHeld { event }
            | DispatchError::NotStarted { event }
            | DispatchError::AlreadyStarted { event }
            | DispatchError::Completed { event }
            | DispatchError::Abandoned { event } => event,
        }
    }

    /// Returns `true` for [`DispatchError::StuckPipeline`].
    pub fn is_stuck(&self) -> bool {
        matches!(self, DispatchError::StuckPipeline { .. })
    }
}

/// Errors that can occur while a provider resolves handlers.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Nothing is registered for the event type.
    #[error("no handler list registered for {0}")]
    UnknownEvent(&'static str),
}
