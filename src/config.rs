use tokio::runtime::Handle;

use crate::AllowedEvents;

/// Construction-time configuration of an [`EventEmitter`](crate::EventEmitter).
///
/// Use the builder methods to customize, or [`Default`] for an unrestricted
/// emitter that schedules async listeners on the current Tokio runtime.
///
/// # Examples
///
/// ```rust
/// use typed_emitter::{Config, EventEmitter};
///
/// let config = Config::default().with_allowed_events(["connect", "disconnect"]);
/// let emitter = EventEmitter::<String>::with_config(config);
/// assert!(emitter.allowed_events().contains("connect"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit allowed-event set. When set, type-level inference is skipped
    /// and the set is used as is (an empty set stays unrestricted).
    /// Default: `None`
    pub allowed_events: Option<AllowedEvents>,

    /// Runtime that async listeners are spawned on.
    /// When `None`, the runtime current at `emit` time is used.
    /// Default: `None`
    pub runtime: Option<Handle>,
}

impl Config {
    /// Restrict the emitter to the given event names. Duplicates are collapsed.
    pub fn with_allowed_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_events = Some(events.into_iter().collect());
        self
    }

    /// Spawn async listeners on `handle` instead of the caller's runtime.
    ///
    /// This lets `emit` be called from threads outside of any runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }
}
