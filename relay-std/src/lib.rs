//! # relay-std
//!
//! Standard implementations for the Relay asynchronous event dispatch engine.
//!
//! This crate provides:
//! - **Dispatch engine**: [`AsyncEvent`] with the [`Strict`], [`Reentrant`]
//!   and [`Prioritized`] policies
//! - **Building blocks**: [`HandlerCursor`], [`CallbackHolder`]
//! - **Registries**: [`Registry`], [`RegistryBuilder`], [`Registries`]
//! - **Standard handlers**: Logging, tokio-backed async work
//! - **Testing utilities**: recording and holding handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use relay_core;

mod macros;

pub mod callback;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod testing;

pub use callback::{AlreadyFired, Callback, CallbackHolder};
pub use config::{DispatchConfig, StuckPolicy};
pub use cursor::HandlerCursor;
pub use dispatch::{
    AsyncEvent, Batch, Completion, HoldViolation, Phase, Policy, PrioritizedEvent, Prioritized,
    Reentrant, ReentrantEvent, SequentialEvent, Strict,
};
pub use registry::{Registries, Registry, RegistryBuilder};
