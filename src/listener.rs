use std::{
    fmt,
    future::Future,
    hash::{Hash, Hasher},
    sync::Arc,
};

use futures_util::future::{BoxFuture, FutureExt};

use crate::ListenerError;

pub(crate) type SyncFn<A> = dyn Fn(&A) -> Result<(), ListenerError> + Send + Sync;
pub(crate) type TaskFn<A> =
    dyn Fn(A) -> BoxFuture<'static, Result<(), ListenerError>> + Send + Sync;

pub(crate) enum Callback<A> {
    /// Invoked in-line by `emit`.
    Sync(Arc<SyncFn<A>>),
    /// Spawned by `emit` and never awaited by it.
    Task(Arc<TaskFn<A>>),
}

/// A handle to a callable registered against an event name.
///
/// Handles are cheap to clone and clones share identity: registering the same
/// handle (or any clone of it) twice under one event stores it once, and
/// removing it requires that handle (or a clone). Two handles created from
/// separate calls to [`Listener::sync`] or [`Listener::task`] are always
/// distinct, even when they wrap the same function.
///
/// # Example
///
/// ```ignore
/// let on_foo = Listener::sync(|v: &i32| println!("foo: {v}"));
/// emitter.add_event_listener("foo", on_foo.clone())?;
/// emitter.remove_event_listener("foo", &on_foo)?;
/// ```
pub struct Listener<A> {
    callback: Callback<A>,
}

impl<A: 'static> Listener<A> {
    /// Wraps a synchronous callable. It runs on the caller's thread during `emit`,
    /// and an error it returns aborts the remaining dispatch of that `emit`.
    pub fn sync<F, R>(f: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
        R: ListenerOutput,
    {
        Self {
            callback: Callback::Sync(Arc::new(move |args: &A| f(args).into_result())),
        }
    }

    /// Wraps an asynchronous callable. `emit` hands it an owned copy of the
    /// arguments, spawns the returned future and does not wait for it.
    pub fn task<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: ListenerOutput,
    {
        Self {
            callback: Callback::Task(Arc::new(move |args: A| {
                f(args).map(ListenerOutput::into_result).boxed()
            })),
        }
    }
}

impl<A> Listener<A> {
    /// Returns `true` for listeners created with [`Listener::task`].
    #[inline]
    pub fn is_async(&self) -> bool {
        matches!(self.callback, Callback::Task(_))
    }

    #[inline]
    pub(crate) fn callback(&self) -> &Callback<A> {
        &self.callback
    }

    fn addr(&self) -> *const () {
        match &self.callback {
            Callback::Sync(f) => Arc::as_ptr(f) as *const (),
            Callback::Task(f) => Arc::as_ptr(f) as *const (),
        }
    }
}

impl<A> Clone for Listener<A> {
    fn clone(&self) -> Self {
        let callback = match &self.callback {
            Callback::Sync(f) => Callback::Sync(f.clone()),
            Callback::Task(f) => Callback::Task(f.clone()),
        };
        Self { callback }
    }
}

impl<A> PartialEq for Listener<A> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl<A> Eq for Listener<A> {}

impl<A> Hash for Listener<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<A> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("async", &self.is_async())
            .field("addr", &self.addr())
            .finish()
    }
}

/// Values a listener may return: `()` or `Result<(), E>` for any error type
/// convertible into [`ListenerError`].
pub trait ListenerOutput {
    fn into_result(self) -> Result<(), ListenerError>;
}

impl ListenerOutput for () {
    #[inline]
    fn into_result(self) -> Result<(), ListenerError> {
        Ok(())
    }
}

impl<E: Into<ListenerError>> ListenerOutput for Result<(), E> {
    #[inline]
    fn into_result(self) -> Result<(), ListenerError> {
        self.map_err(Into::into)
    }
}
