//! Procedural macros for Relay.
//!
//! - `#[derive(Event)]` implements `relay::Event`, optionally with a
//!   diagnostic name given through `#[event(name = "...")]`.
//! - `#[handler]` turns a function taking `&EventHandle<T>` into a unit
//!   struct implementing `relay::Handler<T>`.

use proc_macro::TokenStream;

mod event;
mod handler;

/// Derive macro for implementing the `Event` trait.
///
/// ```rust,ignore
/// #[derive(Event)]
/// #[event(name = "PlayerJoinEvent")]
/// struct PlayerJoin {
///     name: String,
/// }
/// ```
#[proc_macro_derive(Event, attributes(event))]
pub fn derive_event(input: TokenStream) -> TokenStream {
    event::derive_event_impl(input)
}

/// Attribute macro creating a handler from a function.
///
/// Accepts `priority = N` (lower runs first, default `0`) and
/// `owner = "..."` (defaults to the function path).
///
/// ```rust,ignore
/// #[relay::handler(priority = -10, owner = "Economy")]
/// fn charge_fee(event: &EventHandle<PlayerJoin>) -> Result<(), BoxError> {
///     event.hold()?;
///     // ...
///     Ok(())
/// }
///
/// registry.register(charge_fee, charge_fee::meta());
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item)
}
