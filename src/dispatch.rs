use tokio::task::JoinHandle;

use crate::{Error, ListenerError, Result};

pub(crate) type TaskHandle = JoinHandle<std::result::Result<(), ListenerError>>;

/// Outcome of a single [`EventEmitter::emit`](crate::EventEmitter::emit) call.
///
/// By the time `emit` returns, every synchronous listener has run and every
/// asynchronous one has been spawned. Dropping a `Dispatch` detaches the
/// spawned tasks; they keep running and report failures through `tracing`.
/// Keep it and call [`Dispatch::join`] to observe their outcomes instead.
#[derive(Debug)]
pub struct Dispatch {
    event: String,
    invoked: usize,
    tasks: Vec<TaskHandle>,
}

impl Dispatch {
    pub(crate) fn new(event: &str) -> Self {
        Self {
            event: event.to_owned(),
            invoked: 0,
            tasks: Vec::new(),
        }
    }

    pub(crate) fn record_invoked(&mut self) {
        self.invoked += 1;
    }

    pub(crate) fn record_scheduled(&mut self, handle: TaskHandle) {
        self.tasks.push(handle);
    }

    /// The event that was emitted.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Number of synchronous listeners that ran in-line.
    #[inline]
    pub fn invoked(&self) -> usize {
        self.invoked
    }

    /// Number of asynchronous listeners that were spawned.
    #[inline]
    pub fn scheduled(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when no listener was registered for the event.
    pub fn is_empty(&self) -> bool {
        self.invoked == 0 && self.tasks.is_empty()
    }

    /// Waits for every spawned listener and returns their outcomes in
    /// registration order.
    ///
    /// A listener error is reported as [`Error::Listener`], a panicked or
    /// aborted task as [`Error::ListenerJoin`].
    pub async fn join(self) -> Vec<Result<()>> {
        let mut results = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            let outcome = match task.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(source)) => Err(Error::Listener {
                    event: self.event.clone(),
                    source,
                }),
                Err(e) => Err(Error::from(e)),
            };
            results.push(outcome);
        }
        results
    }
}
