//! # relay - Asynchronous Notification Dispatch
//!
//! `relay` delivers an event to an ordered list of handlers, letting any
//! handler put the delivery on hold until some asynchronous work finishes.
//! The dispatcher keeps an ordinary "notify everyone" loop while handlers
//! load data, ask a remote service, or wait for a timer.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay::prelude::*;
//! use std::sync::Arc;
//!
//! struct PlayerJoin { name: String }
//! impl Event for PlayerJoin {}
//!
//! let registry = Arc::new(Registry::new());
//! registry.register(
//!     |event: &EventHandle<PlayerJoin>| -> Result<(), BoxError> {
//!         event.hold()?;
//!         let event = event.clone();
//!         std::thread::spawn(move || {
//!             // slow lookup ...
//!             let _ = event.resume();
//!         });
//!         Ok(())
//!     },
//!     RegistrationMeta::new().with_owner("Ranks"),
//! );
//!
//! let join = SequentialEvent::new(PlayerJoin { name: "alex".into() }, registry);
//! join.set_callback(|join| println!("{} is ready", join.name))?;
//! join.call()?;
//! ```
//!
//! ## Policies
//!
//! | Alias | Policy | Holds |
//! |-------|--------|-------|
//! | [`SequentialEvent`] | [`Strict`] | one at a time, each matched by one resume |
//! | [`ReentrantEvent`] | [`Reentrant`] | idempotent, stray resumes ignored |
//! | [`PrioritizedEvent`] | [`Prioritized`] | counted, a whole tier runs before waiting |
//!
//! ## Features
//!
//! - `tracing` (default): structured logs through `tracing`
//! - `tokio`: [`handlers::AsyncHandler`] running futures on the tokio runtime
//! - `macros`: `#[derive(Event)]` and `#[handler]`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use relay_core::{
    // Error types
    BoxError,
    DispatchError,
    // Registration
    EnabledHandle,
    // Event
    Event,
    // Handle
    EventHandle,
    // Handler
    Handler,
    HandlerProvider,
    HoldGuard,
    Occurrence,
    ProviderError,
    Registration,
    RegistrationMeta,
    RelayError,
    Tier,
};

// Dispatch engine
pub use relay_std::{
    AsyncEvent, Batch, Completion, HoldViolation, Phase, Policy, Prioritized, PrioritizedEvent,
    Reentrant, ReentrantEvent, SequentialEvent, Strict,
};

// Building blocks
pub use relay_std::{
    AlreadyFired, Callback, CallbackHolder, DispatchConfig, HandlerCursor, StuckPolicy,
};

// Registries
pub use relay_std::{Registries, Registry, RegistryBuilder};

/// Standard handler implementations.
pub mod handlers {
    #![allow(clippy::wildcard_imports)]
    pub use relay_std::handlers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use relay_std::testing::*;
}

/// Prelude module - common imports for Relay.
///
/// # Usage
///
/// ```rust,ignore
/// use relay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        DispatchError,
        // Core traits
        Event,
        EventHandle,
        Handler,
        HandlerProvider,
        // Dispatch
        PrioritizedEvent,
        ReentrantEvent,
        // Registration
        Registry,
        RegistryBuilder,
        RegistrationMeta,
        SequentialEvent,
    };
}

#[cfg(feature = "macros")]
pub use relay_macros::{Event, handler};
