use std::{collections::BTreeSet, fmt};

/// The resolved set of event names an emitter accepts.
///
/// An empty set means the emitter is unrestricted: every event name passes
/// validation. Names are kept sorted so diagnostics are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedEvents(BTreeSet<String>);

impl AllowedEvents {
    /// An empty, unrestricted set.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, event: &str) -> bool {
        self.0.contains(event)
    }

    /// Returns `true` when `event` passes validation against this set.
    #[inline]
    pub fn permits(&self, event: &str) -> bool {
        self.is_unrestricted() || self.contains(event)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedEvents {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for AllowedEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{name}'")?;
        }
        write!(f, "}}")
    }
}
