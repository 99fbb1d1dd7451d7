//! Dynamic event subscriptions with disposable handles.
//!
//! Unlike registry event handlers (fixed at build time), subscriptions
//! attach and detach while the process runs -- UI-side components
//! subscribe during initialization and must dispose the handle when they
//! are torn down, so the bus never invokes a callback on dead state.
//! Dropping a [`Subscription`] disposes it; `dispose()` is idempotent.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use crate::message::Event;

type Callback = Arc<dyn Fn(&(dyn Any + Send + Sync)) + Send + Sync>;

struct SubEntry {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct SubInner {
    next_id: u64,
    by_tag: HashMap<&'static str, Vec<SubEntry>>,
}

/// The set of live dynamic subscribers, shared with the event bus.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Arc<Mutex<SubInner>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a callback for event shape `E`. The returned handle owns the
    /// registration; the set never removes a callback on its own.
    pub fn subscribe<E, F>(&self, callback: F) -> Subscription
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.by_tag.entry(E::TAG.as_str()).or_default().push(SubEntry {
            id,
            callback: Arc::new(move |event| {
                if let Some(event) = event.downcast_ref::<E>() {
                    callback(event);
                }
            }),
        });
        Subscription {
            inner: Arc::downgrade(&self.inner),
            tag: E::TAG.as_str(),
            id,
        }
    }

    /// Invoke every live subscriber for `tag` in subscription order.
    /// Returns how many were invoked.
    ///
    /// The callback list is snapshotted before invocation, so a callback
    /// may subscribe or dispose without deadlocking; such changes take
    /// effect from the next publish.
    pub fn notify(&self, tag: &str, event: &(dyn Any + Send + Sync)) -> usize {
        let snapshot: Vec<Callback> = {
            let inner = self.inner.lock().unwrap();
            match inner.by_tag.get(tag) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.callback)).collect(),
                None => return 0,
            }
        };

        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }

    /// How many live subscriptions exist for `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .by_tag
            .get(tag)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Live, cancellable association between one callback and one event tag.
/// Owned by the caller; disposed explicitly or on drop.
pub struct Subscription {
    inner: Weak<Mutex<SubInner>>,
    tag: &'static str,
    id: u64,
}

impl Subscription {
    /// Remove exactly this callback. Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap();
            if let Some(entries) = inner.by_tag.get_mut(self.tag) {
                entries.retain(|e| e.id != self.id);
            }
        }
    }

    /// Whether this subscription is still registered.
    pub fn is_active(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner
                .lock()
                .unwrap()
                .by_tag
                .get(self.tag)
                .is_some_and(|entries| entries.iter().any(|e| e.id == self.id)),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
