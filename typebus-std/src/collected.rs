//! Listeners collected at link time via `inventory`.
//!
//! `#[typebus::subscribe]` submits a [`CollectedListener`] for each annotated
//! function. [`Dispatcher::register_collected`] gathers them into a
//! dispatcher at runtime.

use crate::dispatcher::Dispatcher;
use typebus_core::{ListenerHandle, RegistrationWarning};

/// A listener entry submitted to the distributed collection.
pub struct CollectedListener {
    /// Name for debugging.
    pub name: &'static str,
    /// Priority for ordering (higher registers first).
    pub priority: i32,
    /// Builds a fresh handle for the listener.
    pub factory: fn() -> ListenerHandle,
}

impl CollectedListener {
    /// Create a new collected listener entry.
    pub const fn new(name: &'static str, priority: i32, factory: fn() -> ListenerHandle) -> Self {
        Self {
            name,
            priority,
            factory,
        }
    }
}

inventory::collect!(CollectedListener);

/// All collected listeners, highest priority first, then by name.
pub fn collected() -> Vec<&'static CollectedListener> {
    let mut entries: Vec<&'static CollectedListener> =
        inventory::iter::<CollectedListener>.into_iter().collect();
    entries.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(b.name)));
    entries
}

impl Dispatcher {
    /// Register one fresh handle per collected listener.
    ///
    /// Returns the registration warnings, as [`register`](Self::register).
    pub fn register_collected(&self) -> Vec<RegistrationWarning> {
        let handles: Vec<ListenerHandle> = collected()
            .into_iter()
            .map(|entry| (entry.factory)())
            .collect();
        tracing::debug!(count = handles.len(), "registering collected listeners");
        self.register(handles)
    }
}
