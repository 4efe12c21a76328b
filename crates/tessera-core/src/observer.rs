//! Ordered observer lists.
//!
//! Every notification in the workspace is an [`Observers`] list: callbacks
//! run inline, synchronously, in registration order. The list is
//! snapshotted before dispatch, so a callback may subscribe or unsubscribe
//! (itself included) without deadlocking; such changes take effect from the
//! next notification.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::id::SubscriptionId;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// An ordered list of callbacks receiving `&E`.
pub struct Observers<E: ?Sized> {
    entries: Mutex<Vec<(SubscriptionId, Callback<E>)>>,
}

impl<E: ?Sized> Observers<E> {
    /// An empty list.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append a callback; it runs after every previously registered one.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        let callback: Callback<E> = Arc::new(callback);
        self.entries.lock().push((id, callback));
        id
    }

    /// Remove a callback. Returns `false` if `id` is not registered here.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Invoke every callback with `event`, in registration order.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }
}

impl<E: ?Sized> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn notifies_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let obs: Observers<u32> = Observers::new();
        for tag in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            obs.subscribe(move |v: &u32| seen.lock().push(format!("{tag}{v}")));
        }
        obs.notify(&7);
        assert_eq!(*seen.lock(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_callback() {
        let hits = Arc::new(AtomicUsize::new(0));
        let obs: Observers<()> = Observers::new();
        let h1 = Arc::clone(&hits);
        let first = obs.subscribe(move |_| {
            h1.fetch_add(1, Ordering::Relaxed);
        });
        let h2 = Arc::clone(&hits);
        obs.subscribe(move |_| {
            h2.fetch_add(10, Ordering::Relaxed);
        });

        assert!(obs.unsubscribe(first));
        assert!(!obs.unsubscribe(first));
        obs.notify(&());
        assert_eq!(hits.load(Ordering::Relaxed), 10);
        assert_eq!(obs.len(), 1);
    }

    #[test]
    fn callback_may_subscribe_during_dispatch() {
        let obs: Arc<Observers<()>> = Arc::new(Observers::new());
        let inner = Arc::clone(&obs);
        obs.subscribe(move |_| {
            inner.subscribe(|_| {});
        });
        obs.notify(&());
        assert_eq!(obs.len(), 2);
    }

    #[test]
    fn empty_list_reports_empty() {
        let obs: Observers<i32> = Observers::default();
        assert!(obs.is_empty());
        obs.notify(&1);
    }
}
