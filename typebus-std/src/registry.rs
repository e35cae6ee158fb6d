//! Concurrent listener registry.
//!
//! The registry is an ordered list of [`ListenerHandle`]s published as an
//! immutable snapshot through [`ArcSwap`].
//!
//! # Concurrency
//!
//! - Readers (pushes) load the current snapshot wait-free and never block on
//!   writers. A listener may therefore register, unregister or clear on the
//!   dispatcher that is invoking it.
//! - Writers serialize on a mutex, take a structurally shared copy of the
//!   current list, apply one whole batch and publish the result in a single
//!   store. A push sees either all of a batch or none of it.
//! - Appends cost `O(log n)`, not a copy of the list, so registering
//!   listeners one at a time stays cheap at large registry sizes.
//! - The replaced snapshot is released after the writer lock. A listener
//!   whose `Drop` touches the registry cannot deadlock it.
//! - A push keeps traversing the snapshot it loaded; mutations published
//!   meanwhile are seen by later pushes.

use arc_swap::ArcSwap;
use im::Vector;
use parking_lot::Mutex;
use std::sync::Arc;
use typebus_core::{ListenerHandle, TypeTag};

/// The ordered list of registered handles.
pub type Entries = Vector<ListenerHandle>;

/// Shared snapshot of registered listeners, in visitation order.
pub type Snapshot = Arc<Entries>;

/// An ordered, concurrently readable collection of listener handles.
pub struct Registry {
    entries: ArcSwap<Entries>,
    write: Mutex<()>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vector::new()),
            write: Mutex::new(()),
        }
    }

    /// The current snapshot, in insertion order.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        self.entries.load_full()
    }

    /// Apply a batch of changes atomically.
    ///
    /// `f` receives a private copy of the current list; the copy is published
    /// once `f` returns, unless it reports that nothing changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut Entries) -> (R, bool)) -> R {
        let (result, previous) = {
            let _guard = self.write.lock();
            let mut next = Entries::clone(&self.entries.load());
            let (result, changed) = f(&mut next);
            let previous = changed.then(|| self.entries.swap(Arc::new(next)));
            (result, previous)
        };
        drop(previous);
        result
    }

    /// Remove every listener.
    ///
    /// Returns how many were removed.
    pub fn clear(&self) -> usize {
        let previous = {
            let _guard = self.write.lock();
            self.entries.swap(Arc::new(Vector::new()))
        };
        previous.len()
    }

    /// Number of registered entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Whether `handle` is registered at least once.
    pub fn contains(&self, handle: &ListenerHandle) -> bool {
        self.entries.load().iter().any(|h| h.ptr_eq(handle))
    }

    /// Number of entries bound to the given type.
    pub fn count_for(&self, tag: &TypeTag) -> usize {
        self.entries.load().iter().filter(|h| h.accepts(tag)).count()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.load().iter()).finish()
    }
}

/// Remove the first entry identical to `handle`.
pub(crate) fn remove_first(entries: &mut Entries, handle: &ListenerHandle) -> bool {
    match entries.iter().position(|h| h.ptr_eq(handle)) {
        Some(index) => {
            entries.remove(index);
            true
        }
        None => false,
    }
}
