//! # relay-core
//!
//! Core traits for the Relay asynchronous event dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugins that register handlers but don't need the engine from `relay-std`.
//!
//! # Moving Parts
//!
//! ## Events ([`Event`])
//!
//! Anything that is `Send + Sync + 'static` and names itself for diagnostics.
//!
//! ## Handlers ([`Handler`])
//!
//! A synchronous call receiving an [`EventHandle`]. Through the handle a
//! handler can put the dispatch on hold and resume it later, from any thread,
//! which lets an ordinary "notify everyone" loop wait for asynchronous work
//! without blocking the caller.
//!
//! ## Registrations ([`Registration`], [`Tier`])
//!
//! A handler plus its priority tier and owner. The owner only matters when a
//! dispatch gets stuck: it names who forgot to resume.
//!
//! ## Providers ([`HandlerProvider`])
//!
//! The registry seam. Yields the ordered registrations, or the registrations
//! grouped into tiers, for an event.
//!
//! # Error Types
//!
//! - [`RelayError`] - Top-level error type
//! - [`DispatchError`] - Dispatch misuse and stuck pipelines
//! - [`ProviderError`] - Handler resolution errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod handle;
mod handler;
mod provider;
mod registration;

// Re-exports
pub use error::{BoxError, DispatchError, ProviderError, RelayError};
pub use event::Event;
pub use handle::{EventHandle, HoldGuard, Occurrence};
pub use handler::Handler;
pub use provider::HandlerProvider;
pub use registration::{EnabledHandle, Registration, RegistrationMeta, Tier};
