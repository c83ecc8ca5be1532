use relay::{
    Event, PrioritizedEvent, RegistrationMeta, Registries, SequentialEvent,
    testing::{CountingHandler, Journal, RecordingHandler},
};
use std::sync::Arc;

struct ServerTick;
impl Event for ServerTick {}

struct Unheard;
impl Event for Unheard {}

#[test]
fn test_registries_resolve_by_event_type() {
    let registries = Arc::new(Registries::new());
    let journal = Journal::new();
    let ticks = registries.registry::<ServerTick>();
    ticks.register(
        RecordingHandler::new("late", &journal),
        RegistrationMeta::new().with_priority(5),
    );
    ticks.register(
        RecordingHandler::new("early", &journal),
        RegistrationMeta::new().with_priority(-5),
    );

    let tick = PrioritizedEvent::new(ServerTick, registries.clone());
    tick.call().unwrap();
    assert_eq!(journal.entries(), ["early", "late"]);

    // Nothing registered for this type: the dispatch still completes.
    let quiet = SequentialEvent::new(Unheard, registries);
    quiet.call().unwrap();
    assert!(quiet.is_completed());
}

#[test]
fn test_disabled_and_removed_handlers_are_skipped() {
    let registries = Registries::new();
    let counter = CountingHandler::new();
    let registry = registries.registry::<ServerTick>();
    let toggle = registry.register(
        counter.clone(),
        RegistrationMeta::new().with_owner("Muted"),
    );
    registry.register(counter.clone(), RegistrationMeta::new().with_owner("Gone"));

    toggle.disable();
    assert_eq!(registry.unregister_owner("Gone"), 1);
    SequentialEvent::new(ServerTick, registry.clone())
        .call()
        .unwrap();
    assert_eq!(counter.count(), 0);

    toggle.enable();
    SequentialEvent::new(ServerTick, registry).call().unwrap();
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_global_registries_are_shared() {
    struct GlobalOnly;
    impl Event for GlobalOnly {}

    let counter = CountingHandler::new();
    Registries::global()
        .registry::<GlobalOnly>()
        .register(counter.clone(), RegistrationMeta::new());

    let registry = Registries::global().get::<GlobalOnly>().unwrap();
    SequentialEvent::new(GlobalOnly, registry).call().unwrap();
    assert_eq!(counter.count(), 1);
}
