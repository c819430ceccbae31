use std::{any::type_name, marker::PhantomData, panic::catch_unwind, sync::OnceLock};

use tokio::{runtime::Handle, sync::Mutex};
use tokio_util::task::TaskTracker;

use crate::{
    AllowedEvents, Config, Dispatch, Error, EventName, Listener, Result,
    internal::Registry,
    listener::Callback,
};

/// Registers listeners under event names and dispatches emitted events to them.
///
/// - `add_event_listener(event, listener)` / `remove_event_listener(event, &listener)`
///   manage registrations. A listener is stored once per event however often it is added.
/// - `emit(event, args)` runs synchronous listeners in-line, in registration order,
///   and spawns asynchronous ones without waiting for them.
/// - `clear()` drops every registration, leaving the allowed-event set untouched.
/// - `has(event)` / `listeners_count(event)` query registrations.
///
/// `A` is the argument type handed to listeners (use a tuple for several values).
/// `K` is the event-name type. With the default `String` the namespace is open
/// unless an explicit set is configured; with an enum deriving
/// [`EventName`](trait@crate::EventName) the allowed set is inferred from its variants.
///
/// All methods take `&self`; share the emitter through an `Arc` to use it from
/// several tasks or from within listeners.
///
/// See also: [`Listener`], [`Config`], [`Dispatch`].
pub struct EventEmitter<A, K: EventName = String> {
    registry: Registry<A>,
    allowed_events: OnceLock<AllowedEvents>,
    runtime: Option<Handle>,
    tracker: TaskTracker,
    settling: Mutex<()>,
    _names: PhantomData<fn() -> K>,
}

impl<A: Clone + Send + 'static> EventEmitter<A> {
    /// Create an emitter with an open string namespace.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an emitter accepting only the given event names.
    pub fn with_allowed_events<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(Config::default().with_allowed_events(events))
    }
}

impl<A: Clone + Send + 'static, K: EventName> EventEmitter<A, K> {
    /// Create an emitter whose allowed events are inferred from `K`.
    pub fn typed() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an emitter with the given configuration.
    ///
    /// An explicit allowed-event set in `config` takes precedence over `K`.
    pub fn with_config(config: Config) -> Self {
        let allowed_events = match config.allowed_events {
            Some(allowed) => OnceLock::from(allowed),
            None => OnceLock::new(),
        };
        Self {
            registry: Registry::new(),
            allowed_events,
            runtime: config.runtime,
            tracker: TaskTracker::new(),
            settling: Mutex::new(()),
            _names: PhantomData,
        }
    }

    /// The resolved set of allowed event names. Empty means unrestricted.
    ///
    /// Without an explicit set, the first call infers it from
    /// [`EventName::allowed_names`] and later calls return the same set.
    pub fn allowed_events(&self) -> &AllowedEvents {
        self.allowed_events.get_or_init(Self::infer_allowed_events)
    }

    // Never fails: a panic degrades to an open namespace.
    fn infer_allowed_events() -> AllowedEvents {
        match catch_unwind(K::allowed_names) {
            Ok(Some(names)) => names.iter().copied().collect(),
            Ok(None) => AllowedEvents::unrestricted(),
            Err(_) => {
                tracing::warn!(
                    event_type = type_name::<K>(),
                    "Inferring allowed events panicked, emitter left unrestricted"
                );
                AllowedEvents::unrestricted()
            }
        }
    }

    fn validate(&self, event: &str) -> Result<()> {
        let allowed = self.allowed_events();
        if allowed.permits(event) {
            return Ok(());
        }
        Err(Error::InvalidEventName {
            event: event.to_owned(),
            allowed: allowed.clone(),
        })
    }

    /// Emit `event`, passing `args` to every listener registered for it.
    ///
    /// Synchronous listeners run before this returns. Asynchronous listeners
    /// get their own copy of `args` and are spawned, never awaited. Emitting an
    /// event nobody listens to is a no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEventName`] if `event` is outside the allowed set.
    /// - [`Error::NoRuntime`] if an async listener is registered but no runtime
    ///   is configured or current. Nothing is dispatched in that case.
    /// - [`Error::Listener`] if a synchronous listener fails. Listeners after it
    ///   are not invoked, while async listeners scheduled before it keep running.
    pub fn emit(&self, event: impl Into<K>, args: A) -> Result<Dispatch> {
        let event: K = event.into();
        self.dispatch(event.name(), args)
    }

    fn dispatch(&self, event: &str, args: A) -> Result<Dispatch> {
        self.validate(event)?;

        let mut dispatch = Dispatch::new(event);
        let listeners = self.registry.snapshot(event);
        if listeners.is_empty() {
            tracing::trace!(event = %event, "No listeners");
            return Ok(dispatch);
        }

        let runtime = if listeners.iter().any(Listener::is_async) {
            Some(self.runtime_handle(event)?)
        } else {
            None
        };

        for listener in &listeners {
            match listener.callback() {
                Callback::Sync(f) => {
                    f(&args).map_err(|source| Error::Listener {
                        event: event.to_owned(),
                        source,
                    })?;
                    dispatch.record_invoked();
                }
                Callback::Task(f) => {
                    let runtime = runtime.as_ref().ok_or_else(|| Error::NoRuntime {
                        event: event.to_owned(),
                    })?;
                    let fut = f(args.clone());
                    let name = event.to_owned();
                    let task = self.tracker.track_future(async move {
                        let result = fut.await;
                        if let Err(e) = &result {
                            tracing::warn!(event = %name, error = %e, "Async listener failed");
                        }
                        result
                    });
                    dispatch.record_scheduled(runtime.spawn(task));
                }
            }
        }

        tracing::trace!(
            event = %event,
            invoked = dispatch.invoked(),
            scheduled = dispatch.scheduled(),
            "Event emitted"
        );
        Ok(dispatch)
    }

    fn runtime_handle(&self, event: &str) -> Result<Handle> {
        match &self.runtime {
            Some(handle) => Ok(handle.clone()),
            None => Handle::try_current().map_err(|_| Error::NoRuntime {
                event: event.to_owned(),
            }),
        }
    }

    /// Bind an event name, so it can be emitted repeatedly without naming it again.
    pub fn bind(&self, event: impl Into<K>) -> BoundEvent<'_, A, K> {
        BoundEvent {
            emitter: self,
            event: event.into(),
        }
    }

    /// Register `listener` for `event`. Adding an already registered listener has no effect.
    pub fn add_event_listener(&self, event: impl Into<K>, listener: Listener<A>) -> Result<()> {
        let event: K = event.into();
        let event = event.name();
        self.validate(event)?;
        let is_async = listener.is_async();
        let added = self.registry.add(event, listener);
        tracing::debug!(event = %event, is_async, added, "Listener registered");
        Ok(())
    }

    /// Unregister `listener` from `event`. Removing a listener that isn't registered is a no-op.
    pub fn remove_event_listener(&self, event: impl Into<K>, listener: &Listener<A>) -> Result<()> {
        let event: K = event.into();
        let event = event.name();
        self.validate(event)?;
        let removed = self.registry.remove(event, listener);
        tracing::debug!(event = %event, removed, "Listener unregistered");
        Ok(())
    }

    /// Drop all listeners of all events.
    ///
    /// Async listeners that are already running are not cancelled.
    pub fn clear(&self) {
        self.registry.clear();
        tracing::debug!("Listeners cleared");
    }

    /// Returns `true` if at least one listener is registered for `event`.
    pub fn has(&self, event: impl Into<K>) -> Result<bool> {
        Ok(self.listeners_count(event)? > 0)
    }

    /// Number of distinct listeners registered for `event`.
    pub fn listeners_count(&self, event: impl Into<K>) -> Result<usize> {
        let event: K = event.into();
        let event = event.name();
        self.validate(event)?;
        Ok(self.registry.count(event))
    }

    /// Number of async listeners spawned by this emitter that haven't finished yet.
    pub fn pending_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every async listener spawned so far has finished.
    ///
    /// Concurrent callers are serialized, so one caller reopening the tracker
    /// can't leave another waiting on it.
    pub async fn settle(&self) {
        let _guard = self.settling.lock().await;
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

impl<A: Clone + Send + 'static, K: EventName> Default for EventEmitter<A, K> {
    fn default() -> Self {
        Self::typed()
    }
}

impl<A, K: EventName> std::fmt::Debug for EventEmitter<A, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("names", &type_name::<K>())
            .field("allowed_events", &self.allowed_events.get())
            .field("pending_tasks", &self.tracker.len())
            .finish_non_exhaustive()
    }
}

/// An event name bound to its emitter, as returned by [`EventEmitter::bind`].
pub struct BoundEvent<'a, A, K: EventName = String> {
    emitter: &'a EventEmitter<A, K>,
    event: K,
}

impl<A: Clone + Send + 'static, K: EventName> BoundEvent<'_, A, K> {
    /// Same as [`EventEmitter::emit`] with the bound event name.
    pub fn emit(&self, args: A) -> Result<Dispatch> {
        self.emitter.dispatch(self.event.name(), args)
    }

    pub fn event(&self) -> &str {
        self.event.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    struct Broken;

    impl EventName for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn allowed_names() -> Option<&'static [&'static str]> {
            panic!("no names available")
        }
    }

    struct Empty;

    impl EventName for Empty {
        fn name(&self) -> &str {
            "empty"
        }

        fn allowed_names() -> Option<&'static [&'static str]> {
            Some(&[])
        }
    }

    static COUNTED_CALLS: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl EventName for Counted {
        fn name(&self) -> &str {
            "counted"
        }

        fn allowed_names() -> Option<&'static [&'static str]> {
            COUNTED_CALLS.fetch_add(1, Ordering::SeqCst);
            Some(&["counted"])
        }
    }

    #[test]
    fn test_inference_runs_once() {
        let emitter = EventEmitter::<(), Counted>::typed();
        assert_eq!(COUNTED_CALLS.load(Ordering::SeqCst), 0);

        emitter.emit(Counted, ()).unwrap();
        assert!(!emitter.has(Counted).unwrap());
        assert_eq!(emitter.listeners_count(Counted).unwrap(), 0);
        assert_eq!(emitter.allowed_events().len(), 1);
        assert_eq!(emitter.allowed_events().len(), 1);

        assert_eq!(COUNTED_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_inference_leaves_emitter_unrestricted() {
        let emitter = EventEmitter::<(), Broken>::typed();
        assert!(emitter.allowed_events().is_unrestricted());
        assert!(emitter.emit(Broken, ()).is_ok());
    }

    #[test]
    fn test_empty_inference_is_unrestricted() {
        let emitter = EventEmitter::<(), Empty>::typed();
        assert!(emitter.allowed_events().is_unrestricted());
        assert_eq!(emitter.listeners_count(Empty).unwrap(), 0);
    }

    #[test]
    fn test_explicit_set_skips_inference() {
        let config = Config::default().with_allowed_events(["other"]);
        let emitter = EventEmitter::<(), Broken>::with_config(config);
        assert_eq!(
            emitter.allowed_events(),
            &["other"].into_iter().collect::<AllowedEvents>()
        );
        assert!(matches!(
            emitter.emit(Broken, ()),
            Err(Error::InvalidEventName { .. })
        ));
    }

    #[test]
    fn test_sync_only_dispatch_needs_no_runtime() {
        let emitter = EventEmitter::<u8>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        emitter
            .add_event_listener("tick", Listener::sync(move |_: &u8| {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let dispatch = emitter.emit("tick", 1).unwrap();
        assert_eq!(dispatch.invoked(), 1);
        assert_eq!(dispatch.scheduled(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_async_listener_without_runtime_dispatches_nothing() {
        let emitter = EventEmitter::<u8>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        emitter
            .add_event_listener("tick", Listener::sync(move |_: &u8| {
                c.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        emitter
            .add_event_listener("tick", Listener::task(|_: u8| async {}))
            .unwrap();

        let err = emitter.emit("tick", 1).unwrap_err();
        assert!(matches!(err, Error::NoRuntime { ref event } if event == "tick"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_does_not_resolve_allowed_events() {
        let emitter = EventEmitter::<(), Broken>::typed();
        let repr = format!("{emitter:?}");
        assert!(repr.contains("allowed_events: None"));
    }
}
