//! Registry module for handler management.
//!
//! [`Registry`] keeps the registrations of one event type sorted by priority
//! and hands dispatches a snapshot of the enabled ones. [`Registries`] maps
//! event types to their registries.

use crate::macros::log_debug;
use relay_core::{
    BoxError, EnabledHandle, Event, Handler, HandlerProvider, ProviderError, Registration,
    RegistrationMeta,
};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// ============================================================================
// Registry - priority-sorted handler storage
// ============================================================================

/// A thread-safe, priority-sorted list of registrations for one event type.
///
/// Registrations with equal priority keep their registration order. The
/// registry can change at any time; dispatches already in flight keep the
/// snapshot they took when they started.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(Registry::new());
/// registry.register(greet, RegistrationMeta::new().with_owner("Greeter"));
/// registry.register(audit, RegistrationMeta::new().with_priority(10));
///
/// SequentialEvent::new(PlayerJoin::new("alex"), registry.clone()).call()?;
/// ```
pub struct Registry<E: Event> {
    entries: RwLock<Vec<Registration<E>>>,
}

impl<E: Event> Registry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Start building a registry.
    pub fn builder() -> RegistryBuilder<E> {
        RegistryBuilder::new()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Registration<E>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Registration<E>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a handler, returning a handle to toggle it at runtime.
    pub fn register<H: Handler<E>>(&self, handler: H, meta: RegistrationMeta) -> EnabledHandle {
        self.insert(Registration::new(handler, meta))
    }

    /// Register a prepared registration.
    pub fn insert(&self, registration: Registration<E>) -> EnabledHandle {
        let enabled = registration.meta().enabled_handle();
        let mut entries = self.write();
        let at = entries.partition_point(|e| e.priority() <= registration.priority());
        log_debug!(
            owner = registration.owner(),
            priority = registration.priority(),
            "handler registered"
        );
        entries.insert(at, registration);
        enabled
    }

    /// Remove every registration of an owner, returning how many were removed.
    pub fn unregister_owner(&self, owner: &str) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| e.owner() != owner);
        before - entries.len()
    }

    /// Remove every registration.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Snapshot of the enabled registrations in dispatch order.
    pub fn snapshot(&self) -> Vec<Registration<E>> {
        self.read()
            .iter()
            .filter(|e| e.is_enabled())
            .cloned()
            .collect()
    }

    /// Get the number of registrations, enabled or not.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<E: Event> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> HandlerProvider<E> for Registry<E> {
    fn handlers_for(&self, _event: &E) -> Result<Vec<Registration<E>>, BoxError> {
        Ok(self.snapshot())
    }
}

// ============================================================================
// RegistryBuilder - for constructing registries
// ============================================================================

/// Builder for constructing a Registry.
///
/// # Example
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .register(my_handler)
///     .register_with_priority(early_handler, -10)
///     .build();
/// ```
pub struct RegistryBuilder<E: Event> {
    entries: Vec<Registration<E>>,
}

impl<E: Event> RegistryBuilder<E> {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a handler with default metadata.
    pub fn register<H: Handler<E>>(self, handler: H) -> Self {
        self.register_with_meta(handler, RegistrationMeta::new())
    }

    /// Register a handler with specified metadata.
    pub fn register_with_meta<H: Handler<E>>(mut self, handler: H, meta: RegistrationMeta) -> Self {
        self.entries.push(Registration::new(handler, meta));
        self
    }

    /// Register a handler with priority.
    pub fn register_with_priority<H: Handler<E>>(self, handler: H, priority: i32) -> Self {
        self.register_with_meta(handler, RegistrationMeta::new().with_priority(priority))
    }

    /// Register a handler with an owner.
    pub fn register_with_owner<H: Handler<E>>(
        self,
        handler: H,
        owner: &'static str,
    ) -> Self {
        self.register_with_meta(handler, RegistrationMeta::new().with_owner(owner))
    }

    /// Build the registry.
    ///
    /// Sorts entries by priority; equal priorities keep registration order.
    pub fn build(mut self) -> Registry<E> {
        self.entries.sort_by_key(|e| e.priority());
        Registry {
            entries: RwLock::new(self.entries),
        }
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the builder has no handlers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Event> Default for RegistryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Registries - one registry per event type
// ============================================================================

/// Registries keyed by event type.
///
/// Acts as a provider for every event type at once; an event type nobody
/// registered for resolves to an error, which dispatches treat as "no
/// handlers".
#[derive(Default)]
pub struct Registries {
    lists: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Registries {
    /// Create an empty set of registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registries.
    pub fn global() -> &'static Registries {
        static GLOBAL: OnceLock<Registries> = OnceLock::new();
        GLOBAL.get_or_init(Registries::new)
    }

    /// The registry for `E`, created on first use.
    pub fn registry<E: Event>(&self) -> Arc<Registry<E>> {
        if let Some(registry) = self.get::<E>() {
            return registry;
        }
        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have created it since the read above.
        if let Some(registry) = lists.get(&TypeId::of::<E>()).cloned().and_then(downcast) {
            return registry;
        }
        let registry = Arc::new(Registry::<E>::new());
        lists.insert(TypeId::of::<E>(), registry.clone());
        registry
    }

    /// The registry for `E`, if one was created.
    pub fn get<E: Event>(&self) -> Option<Arc<Registry<E>>> {
        let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
        lists.get(&TypeId::of::<E>()).cloned().and_then(downcast)
    }
}

fn downcast<E: Event>(list: Arc<dyn Any + Send + Sync>) -> Option<Arc<Registry<E>>> {
    list.downcast::<Registry<E>>().ok()
}

impl<E: Event> HandlerProvider<E> for Registries {
    fn handlers_for(&self, _event: &E) -> Result<Vec<Registration<E>>, BoxError> {
        match self.get::<E>() {
            Some(registry) => Ok(registry.snapshot()),
            None => Err(ProviderError::UnknownEvent(std::any::type_name::<E>()).into()),
        }
    }
}
