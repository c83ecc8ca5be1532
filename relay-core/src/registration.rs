//! Handler registrations and their metadata.

use crate::{event::Event, handler::Handler};
use std::{
    borrow::Cow,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// A handle for dynamically toggling a registration at runtime.
#[derive(Debug, Clone)]
pub struct EnabledHandle(Arc<AtomicBool>);

impl EnabledHandle {
    /// Create a new enabled handle with the given initial state.
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Check if the registration is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Enable the registration.
    pub fn enable(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Disable the registration.
    pub fn disable(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Toggle the enabled state, returning the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

impl Default for EnabledHandle {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Metadata for a registered handler.
#[derive(Debug, Clone)]
pub struct RegistrationMeta {
    /// Priority tier (lower = executed first). Default is 0.
    pub priority: i32,
    /// Owning plugin or component, reported when a dispatch gets stuck.
    pub owner: Cow<'static, str>,
    enabled: EnabledHandle,
}

impl Default for RegistrationMeta {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationMeta {
    /// Owner reported for registrations that never named one.
    pub const UNKNOWN_OWNER: &'static str = "<unknown>";

    /// Create default enabled metadata.
    pub fn new() -> Self {
        Self {
            priority: 0,
            owner: Cow::Borrowed(Self::UNKNOWN_OWNER),
            enabled: EnabledHandle::new(true),
        }
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<Cow<'static, str>>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Set initial enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = EnabledHandle::new(enabled);
        self
    }

    /// Get a handle for toggling enabled state at runtime.
    pub fn enabled_handle(&self) -> EnabledHandle {
        self.enabled.clone()
    }

    /// Check if the registration is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.is_enabled()
    }
}

/// A handler together with its metadata.
///
/// Cloning is cheap: the handler is shared, so a dispatch can snapshot the
/// registrations it is going to run without copying handlers.
pub struct Registration<E: Event> {
    handler: Arc<dyn Handler<E>>,
    meta: RegistrationMeta,
}

impl<E: Event> Registration<E> {
    /// Create a new registration.
    pub fn new<H: Handler<E>>(handler: H, meta: RegistrationMeta) -> Self {
        Self {
            handler: Arc::new(handler),
            meta,
        }
    }

    /// Create a registration from an already shared handler.
    pub fn from_shared(handler: Arc<dyn Handler<E>>, meta: RegistrationMeta) -> Self {
        Self { handler, meta }
    }

    /// The handler.
    pub fn handler(&self) -> &dyn Handler<E> {
        &*self.handler
    }

    /// The metadata.
    pub fn meta(&self) -> &RegistrationMeta {
        &self.meta
    }

    /// Shortcut for `meta().priority`.
    pub fn priority(&self) -> i32 {
        self.meta.priority
    }

    /// Shortcut for `meta().owner`.
    pub fn owner(&self) -> &str {
        &self.meta.owner
    }

    /// Check if this registration is enabled.
    pub fn is_enabled(&self) -> bool {
        self.meta.is_enabled()
    }
}

impl<E: Event> Clone for Registration<E> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            meta: self.meta.clone(),
        }
    }
}

impl<E: Event> fmt::Debug for Registration<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("priority", &self.meta.priority)
            .field("owner", &self.meta.owner)
            .finish()
    }
}

/// All registrations sharing one priority, in registration order.
pub struct Tier<E: Event> {
    /// The shared priority.
    pub priority: i32,
    /// Registrations of the tier.
    pub registrations: Vec<Registration<E>>,
}

impl<E: Event> Tier<E> {
    /// Groups an ordered sequence into tiers of consecutive equal priority.
    ///
    /// The input order is kept both across and within tiers; no empty tier is
    /// produced.
    pub fn group(registrations: impl IntoIterator<Item = Registration<E>>) -> Vec<Self> {
        let mut tiers: Vec<Self> = Vec::new();
        for registration in registrations {
            match tiers.last_mut() {
                Some(tier) if tier.priority == registration.priority() => {
                    tier.registrations.push(registration);
                }
                _ => tiers.push(Tier {
                    priority: registration.priority(),
                    registrations: vec![registration],
                }),
            }
        }
        tiers
    }
}

impl<E: Event> Clone for Tier<E> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            registrations: self.registrations.clone(),
        }
    }
}

impl<E: Event> fmt::Debug for Tier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tier")
            .field("priority", &self.priority)
            .field("registrations", &self.registrations)
            .finish()
    }
}
