//! Event trait for dispatchable occurrences.

/// A marker trait for events that can be dispatched to handlers.
///
/// Events must be `Send + Sync + 'static`: a dispatch may be resumed from a
/// different thread than the one that started it. Handlers only ever see a
/// shared reference, so state that handlers report back (a cancelled flag, a
/// computed value) lives behind interior mutability.
///
/// # Example
///
/// ```rust,ignore
/// struct PlayerJoin {
///     name: String,
///     cancelled: AtomicBool,
/// }
///
/// impl Event for PlayerJoin {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Event",
    label = "must be `Send + Sync + 'static`",
    note = "Events dispatched by Relay must be thread-safe and static."
)]
pub trait Event: Send + Sync + 'static {
    /// Name used in diagnostics.
    ///
    /// Defaults to the Rust type name.
    fn event_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// Common Event implementations
impl Event for () {}
impl Event for String {}
impl Event for &'static str {}
impl<T: Event> Event for Box<T> {
    fn event_name(&self) -> &'static str {
        (**self).event_name()
    }
}
impl<T: Event> Event for std::sync::Arc<T> {
    fn event_name(&self) -> &'static str {
        (**self).event_name()
    }
}
