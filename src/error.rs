use crate::AllowedEvents;

/// Error returned by listeners. Any `std::error::Error + Send + Sync` converts into it.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("'{event}' is not a known event of this EventEmitter: {allowed}")]
    InvalidEventName {
        event: String,
        allowed: AllowedEvents,
    },

    #[error("Listener for '{event}' failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: ListenerError,
    },

    #[error("No Tokio runtime available to schedule async listeners of '{event}'")]
    NoRuntime { event: String },

    #[error("Listener task join error: {0}")]
    ListenerJoin(#[from] tokio::task::JoinError),
}

impl Error {
    /// Name of the event the error relates to, if any.
    pub fn event(&self) -> Option<&str> {
        match self {
            Error::InvalidEventName { event, .. }
            | Error::Listener { event, .. }
            | Error::NoRuntime { event } => Some(event),
            Error::ListenerJoin(_) => None,
        }
    }
}
