//! Typed event emitter
//!
//! Register listeners under event names and emit events to them. Synchronous
//! listeners run in-line; asynchronous listeners are spawned onto Tokio and
//! never awaited by the emitter (fire-and-forget).
//!
//! The set of valid event names can be restricted explicitly
//! ([`EventEmitter::with_allowed_events`]) or inferred from an event-name type
//! deriving [`EventName`](macro@EventName) ([`EventEmitter::typed`]).
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use typed_emitter::{EventEmitter, Listener};
//!
//! let seen = Arc::new(Mutex::new(None));
//! let emitter = EventEmitter::<i32>::new();
//!
//! let s = seen.clone();
//! emitter.add_event_listener("x", Listener::sync(move |v: &i32| {
//!     *s.lock().unwrap() = Some(*v);
//! }))?;
//! emitter.emit("x", 42)?;
//!
//! assert_eq!(*seen.lock().unwrap(), Some(42));
//! # Ok::<(), typed_emitter::Error>(())
//! ```
//!
//! See `demos/hello-emitter.rs`.

mod allowed_events;
mod config;
mod dispatch;
mod emitter;
mod error;
mod event_name;
mod listener;

mod internal;

pub use allowed_events::AllowedEvents;
pub use config::Config;
pub use dispatch::Dispatch;
pub use emitter::{BoundEvent, EventEmitter};
pub use error::{Error, ListenerError};
pub use event_name::EventName;
pub use listener::{Listener, ListenerOutput};

#[cfg(feature = "macros")]
pub use typed_emitter_macros::EventName;

pub type Result<T = ()> = std::result::Result<T, Error>;
