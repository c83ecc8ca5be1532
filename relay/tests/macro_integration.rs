//! Integration tests for relay macros.

#![cfg(feature = "macros")]

use relay::{BoxError, Event, EventHandle, Handler, Registry, SequentialEvent};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Debug, relay::Event)]
#[event(name = "ChatMessage")]
struct Chat {
    text: String,
}

#[derive(Debug, relay::Event)]
struct Plain;

static SEEN: AtomicUsize = AtomicUsize::new(0);

#[relay::handler(priority = -5, owner = "ChatFilter")]
fn filter_chat(event: &EventHandle<Chat>) -> Result<(), BoxError> {
    if event.text.is_empty() {
        return Err("empty message".into());
    }
    SEEN.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[relay::handler]
fn count_plain(_event: &EventHandle<Plain>) {}

#[test]
fn test_derive_event_uses_the_given_name() {
    let chat = Chat {
        text: "hi".to_owned(),
    };
    assert_eq!(chat.event_name(), "ChatMessage");
    assert!(Plain.event_name().ends_with("Plain"));
}

#[test]
fn test_handler_macro_generates_metadata() {
    assert_eq!(filter_chat::PRIORITY, -5);
    assert_eq!(filter_chat::OWNER, "ChatFilter");
    assert_eq!(count_plain::PRIORITY, 0);
    assert!(count_plain::OWNER.ends_with("count_plain"));

    let meta = filter_chat::meta();
    assert_eq!(meta.priority, -5);
    assert_eq!(meta.owner, "ChatFilter");
}

#[test]
fn test_handler_macro_registers_and_runs() {
    let registry = Arc::new(Registry::new());
    registry.register(filter_chat, filter_chat::meta());

    let chat = SequentialEvent::new(
        Chat {
            text: "hello".to_owned(),
        },
        registry,
    );
    chat.call().unwrap();
    assert!(chat.is_completed());
    assert_eq!(SEEN.load(Ordering::SeqCst), 1);

    let plain = SequentialEvent::new(Plain, Arc::new(Registry::new()));
    assert!(Handler::handle(&count_plain, &plain.handle()).is_ok());
}
