use std::collections::HashMap;

use indexmap::IndexSet;
use parking_lot::RwLock;

use crate::Listener;

/// Listener storage keyed by event name.
///
/// Entries are created on first registration and left in place (possibly
/// empty) after the last removal. Each entry keeps registration order.
#[derive(Debug)]
pub(crate) struct Registry<A> {
    listeners: RwLock<HashMap<String, IndexSet<Listener<A>>>>,
}

impl<A> Registry<A> {
    pub fn new() -> Registry<A> {
        Registry {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Returns `false` if the listener was already registered for `event`.
    pub fn add(&self, event: &str, listener: Listener<A>) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.get_mut(event) {
            Some(set) => set.insert(listener),
            None => {
                listeners.insert(event.to_owned(), IndexSet::from([listener]));
                true
            }
        }
    }

    /// Returns `false` if the listener wasn't registered for `event`.
    pub fn remove(&self, event: &str, listener: &Listener<A>) -> bool {
        self.listeners
            .write()
            .get_mut(event)
            .is_some_and(|set| set.shift_remove(listener))
    }

    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    pub fn count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, IndexSet::len)
    }

    /// Copies the listeners of `event` so dispatch runs without holding the lock.
    pub fn snapshot(&self, event: &str) -> Vec<Listener<A>> {
        self.listeners
            .read()
            .get(event)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let registry = Registry::<u8>::new();
        let listener = Listener::sync(|_: &u8| {});
        assert!(registry.add("foo", listener.clone()));
        assert!(!registry.add("foo", listener.clone()));
        assert_eq!(registry.count("foo"), 1);
    }

    #[test]
    fn test_same_listener_under_different_events() {
        let registry = Registry::<u8>::new();
        let listener = Listener::sync(|_: &u8| {});
        registry.add("foo", listener.clone());
        registry.add("bar", listener.clone());
        assert_eq!(registry.count("foo"), 1);
        assert_eq!(registry.count("bar"), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let registry = Registry::<u8>::new();
        let a = Listener::sync(|_: &u8| {});
        let b = Listener::sync(|_: &u8| {});
        let c = Listener::sync(|_: &u8| {});
        registry.add("foo", a.clone());
        registry.add("foo", b.clone());
        registry.add("foo", c.clone());

        assert!(registry.remove("foo", &b));
        assert_eq!(registry.snapshot("foo"), vec![a, c]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let registry = Registry::<u8>::new();
        let a = Listener::sync(|_: &u8| {});
        let b = Listener::sync(|_: &u8| {});
        assert!(!registry.remove("foo", &a));

        registry.add("foo", a.clone());
        assert!(!registry.remove("foo", &b));
        assert_eq!(registry.count("foo"), 1);
    }

    #[test]
    fn test_emptied_entry_counts_as_none() {
        let registry = Registry::<u8>::new();
        let a = Listener::sync(|_: &u8| {});
        registry.add("foo", a.clone());
        registry.remove("foo", &a);
        assert_eq!(registry.count("foo"), 0);
        assert!(registry.snapshot("foo").is_empty());
    }

    #[test]
    fn test_clear() {
        let registry = Registry::<u8>::new();
        registry.add("foo", Listener::sync(|_: &u8| {}));
        registry.add("bar", Listener::task(|_: u8| async {}));
        registry.clear();
        assert_eq!(registry.count("foo"), 0);
        assert_eq!(registry.count("bar"), 0);
    }
}
