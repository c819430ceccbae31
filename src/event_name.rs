use std::{borrow::Cow, sync::Arc};

/// Type of the event names an [`EventEmitter`](crate::EventEmitter) accepts.
///
/// Plain string types (`String`, `&'static str`, `Arc<str>`, `Cow<'static, str>`)
/// leave the namespace open. A closed enumeration, usually an enum deriving
/// `EventName`, reports its members through [`EventName::allowed_names`] and the
/// emitter infers its allowed set from it the first time the set is needed.
///
/// # Event Names
///
/// When using `#[derive(EventName)]` on an enum, `name()` returns the variant
/// name (or the value given with `#[event(name = "...")]`) and
/// `allowed_names()` returns all of them.
pub trait EventName: Send + Sync + 'static {
    /// The string under which listeners of this event are registered.
    fn name(&self) -> &str;

    /// The finite set of names this type can take, or `None` when unbounded.
    ///
    /// The default implementation returns `None`.
    fn allowed_names() -> Option<&'static [&'static str]>
    where
        Self: Sized,
    {
        None
    }
}

impl EventName for String {
    fn name(&self) -> &str {
        self
    }
}

impl EventName for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl EventName for Arc<str> {
    fn name(&self) -> &str {
        self
    }
}

impl EventName for Cow<'static, str> {
    fn name(&self) -> &str {
        self
    }
}
