#![cfg(feature = "macros")]
//! Integration tests for the EventName derive macro.

use std::sync::Arc;

use parking_lot::Mutex;
use typed_emitter::{AllowedEvents, Config, Error, EventEmitter, EventName, Listener};

#[derive(EventName, Debug, Clone, Copy)]
enum EventTypes {
    #[event(name = "foo")]
    Foo,
    #[event(name = "bar")]
    Bar,
}

#[derive(EventName)]
#[allow(dead_code)]
enum Lifecycle {
    Started,
    Stopped,
}

#[test]
fn test_derived_names() {
    assert_eq!(EventTypes::Foo.name(), "foo");
    assert_eq!(EventTypes::Bar.name(), "bar");
    assert_eq!(Lifecycle::Started.name(), "Started");
    assert_eq!(
        Lifecycle::allowed_names(),
        Some(&["Started", "Stopped"][..])
    );
}

#[test]
fn test_event_type_generic() {
    let emitter = EventEmitter::<(), EventTypes>::typed();

    emitter.emit(EventTypes::Foo, ()).unwrap();
    emitter.emit(EventTypes::Bar, ()).unwrap();

    assert_eq!(
        emitter.allowed_events(),
        &["foo", "bar"].into_iter().collect::<AllowedEvents>()
    );
}

#[test]
fn test_typed_emitter_dispatches_by_name() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let emitter = EventEmitter::<u32, EventTypes>::default();

    let s = seen.clone();
    emitter
        .add_event_listener(EventTypes::Foo, Listener::sync(move |v: &u32| s.lock().push(*v)))
        .unwrap();

    emitter.emit(EventTypes::Foo, 1).unwrap();
    emitter.emit(EventTypes::Bar, 2).unwrap();
    emitter.bind(EventTypes::Foo).emit(3).unwrap();

    assert_eq!(*seen.lock(), vec![1, 3]);
    assert!(emitter.has(EventTypes::Foo).unwrap());
    assert!(!emitter.has(EventTypes::Bar).unwrap());
}

#[test]
fn test_explicit_set_overrides_type() {
    let config = Config::default().with_allowed_events(["foo"]);
    let emitter = EventEmitter::<(), EventTypes>::with_config(config);

    emitter.emit(EventTypes::Foo, ()).unwrap();
    let err = emitter.emit(EventTypes::Bar, ()).unwrap_err();
    assert!(matches!(err, Error::InvalidEventName { ref event, .. } if event == "bar"));
}
