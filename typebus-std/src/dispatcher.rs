//! The typed dispatcher.
//!
//! [`Dispatcher`] owns a [`Registry`] of listeners and a [`PushGate`]. Pushing a
//! value synchronously invokes, on the calling thread, every registered
//! listener bound to the value's exact type, then hands the value back.
//!
//! ```text
//! push(value) ──► gate enabled? ──no──► return value
//!                      │yes
//!                      ▼
//!          for listener in snapshot (insertion order):
//!              ├─ gate disabled since? ──► stop, return value
//!              ├─ tag != TypeTag::of(value) ──► skip
//!              └─ listener.event(&value)
//!                   └─ Err ──► push: log + continue
//!                              try_push: abort, return PushError(value)
//!          return value
//! ```

use crate::{
    config::DispatcherConfig,
    gate::PushGate,
    registry::{self, Registry},
};
use std::{any::Any, sync::Arc};
use typebus_core::{
    DispatchError, ListenerError, ListenerHandle, Message, PushError, RegistrationWarning, TypeTag,
};

/// Outcome of a single push.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners invoked (failed ones included).
    pub invoked: usize,
    /// Listeners that returned an error.
    pub failed: usize,
    /// Whether the gate prevented or cut short the dispatch.
    pub halted: bool,
}

/// What a push does when a listener fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    /// Log the failure and keep visiting listeners.
    Isolate,
    /// Stop at the failure and hand it to the caller.
    Propagate,
}

struct Inner {
    registry: Registry,
    gate: PushGate,
    config: DispatcherConfig,
}

/// An in-process typed publish/dispatch registry.
///
/// Cloning a `Dispatcher` is cheap and yields another handle to the same
/// registry and gate.
///
/// # Example
///
/// ```rust,ignore
/// let bus = Dispatcher::new();
/// bus.register([on::<String>(|s: &String| println!("got {s}"))]);
///
/// let greeting = bus.push(String::from("hello"));
/// assert_eq!(greeting, "hello");
/// ```
///
/// A listener that captures a clone of its own dispatcher keeps the
/// dispatcher alive for as long as it stays registered. Capture a
/// [`PushGate`] instead when the listener only needs to halt dispatch.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a dispatcher with the given configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                gate: PushGate::new(config.initial_push_state),
                config,
            }),
        }
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.config
    }
}

// ============================================================================
// Registration
// ============================================================================

impl Dispatcher {
    /// Append listeners to the registry, in order.
    ///
    /// The whole batch is published at once. A listener that cannot be added
    /// (capacity reached, or a duplicate when duplicates are rejected) is
    /// logged and reported in the returned warnings; the rest of the batch is
    /// still added.
    pub fn register<I>(&self, listeners: I) -> Vec<RegistrationWarning>
    where
        I: IntoIterator<Item = ListenerHandle>,
    {
        // Handles are released after the registry lock, never under it.
        let batch: Vec<ListenerHandle> = listeners.into_iter().collect();
        let config = &self.inner.config;
        let warnings = self.inner.registry.update(|entries| {
            let before = entries.len();
            let mut warnings = Vec::new();
            for handle in &batch {
                if let Some(capacity) = config.capacity {
                    if entries.len() >= capacity {
                        warnings.push(RegistrationWarning::CapacityExceeded {
                            listener: handle.to_string(),
                            capacity,
                        });
                        continue;
                    }
                }
                if config.reject_duplicates && entries.iter().any(|h| h.ptr_eq(handle)) {
                    warnings.push(RegistrationWarning::Duplicate {
                        listener: handle.to_string(),
                    });
                    continue;
                }
                tracing::trace!(listener = %handle, "listener registered");
                entries.push_back(handle.clone());
            }
            let changed = entries.len() != before;
            (warnings, changed)
        });
        report(&warnings);
        warnings
    }

    /// Like [`register`](Self::register), but rejects batches with absent
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidArgument`] naming the first `None`; in
    /// that case nothing is registered.
    pub fn try_register<I>(&self, listeners: I) -> Result<Vec<RegistrationWarning>, DispatchError>
    where
        I: IntoIterator<Item = Option<ListenerHandle>>,
    {
        let listeners = validate("register", listeners)?;
        Ok(self.register(listeners))
    }

    /// Remove the first occurrence of each listener.
    ///
    /// A listener that is not registered is logged and reported in the
    /// returned warnings; it is never an error.
    pub fn unregister<I>(&self, listeners: I) -> Vec<RegistrationWarning>
    where
        I: IntoIterator<Item = ListenerHandle>,
    {
        let batch: Vec<ListenerHandle> = listeners.into_iter().collect();
        let warnings = self.inner.registry.update(|entries| {
            let mut warnings = Vec::new();
            let mut changed = false;
            for handle in &batch {
                if registry::remove_first(entries, handle) {
                    tracing::trace!(listener = %handle, "listener unregistered");
                    changed = true;
                } else {
                    warnings.push(RegistrationWarning::NotRegistered {
                        listener: handle.to_string(),
                    });
                }
            }
            (warnings, changed)
        });
        report(&warnings);
        warnings
    }

    /// Like [`unregister`](Self::unregister), but rejects batches with absent
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidArgument`] naming the first `None`; in
    /// that case nothing is removed.
    pub fn try_unregister<I>(&self, listeners: I) -> Result<Vec<RegistrationWarning>, DispatchError>
    where
        I: IntoIterator<Item = Option<ListenerHandle>>,
    {
        let listeners = validate("unregister", listeners)?;
        Ok(self.unregister(listeners))
    }

    /// Remove every occurrence of `listener`, returning how many were removed.
    pub fn unregister_every(&self, listener: &ListenerHandle) -> usize {
        self.inner.registry.update(|entries| {
            let before = entries.len();
            *entries = entries.iter().filter(|h| !h.ptr_eq(listener)).cloned().collect();
            let removed = before - entries.len();
            (removed, removed > 0)
        })
    }

    /// Remove every listener. The push gate is left as is.
    pub fn unregister_all(&self) {
        let removed = self.inner.registry.clear();
        tracing::debug!(removed, "registry cleared");
    }
}

// ============================================================================
// Push
// ============================================================================

impl Dispatcher {
    /// Deliver `value` to every listener bound to `T` and return it.
    ///
    /// Listener failures are logged and do not stop the dispatch. If the gate
    /// is disabled, before or during the dispatch, no further listener is
    /// visited.
    pub fn push<T: Message>(&self, value: T) -> T {
        self.deliver(&value, TypeTag::of::<T>(), OnFailure::Isolate);
        value
    }

    /// Like [`push`](Self::push), also reporting what happened.
    pub fn push_counted<T: Message>(&self, value: T) -> (T, Delivery) {
        let (delivery, _) = self.deliver(&value, TypeTag::of::<T>(), OnFailure::Isolate);
        (value, delivery)
    }

    /// Deliver `value`, aborting on the first listener failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ListenerError`] wrapped in a [`PushError`] that
    /// still owns `value`. Listeners after the failing one are not invoked.
    pub fn try_push<T: Message>(&self, value: T) -> Result<T, PushError<T>> {
        match self.deliver(&value, TypeTag::of::<T>(), OnFailure::Propagate) {
            (_, Some(error)) => Err(PushError::new(value, error)),
            (_, None) => Ok(value),
        }
    }

    /// Deliver a type-erased value to the listeners bound to its concrete
    /// type. Returns how many listeners were invoked.
    pub fn push_dyn(&self, value: &(dyn Any + Send + Sync)) -> usize {
        let (delivery, _) = self.deliver(value, TypeTag::of_val(value), OnFailure::Isolate);
        delivery.invoked
    }

    /// Visit the current snapshot with `value`.
    ///
    /// Under [`OnFailure::Propagate`] the first failure ends the visit and is
    /// returned; under [`OnFailure::Isolate`] failures are logged and the
    /// returned error is always `None`.
    fn deliver(
        &self,
        value: &(dyn Any + Send + Sync),
        tag: TypeTag,
        on_failure: OnFailure,
    ) -> (Delivery, Option<ListenerError>) {
        let gate = &self.inner.gate;
        let mut delivery = Delivery::default();
        if !gate.is_enabled() {
            delivery.halted = true;
            return (delivery, None);
        }

        let snapshot = self.inner.registry.snapshot();
        for handle in snapshot.iter() {
            if !gate.is_enabled() {
                delivery.halted = true;
                break;
            }
            if !handle.accepts(&tag) {
                continue;
            }
            delivery.invoked += 1;
            if let Err(source) = handle.event_dyn(value) {
                delivery.failed += 1;
                // The handle's tag names the concrete type even for `push_dyn`.
                let error = ListenerError {
                    listener: handle.name().into_owned(),
                    type_tag: handle.type_tag(),
                    source,
                };
                if on_failure == OnFailure::Propagate {
                    return (delivery, Some(error));
                }
                tracing::warn!(
                    listener = %error.listener,
                    event_type = %error.type_tag,
                    error = %error.source,
                    "listener failed"
                );
            }
        }

        tracing::trace!(
            event_type = %tag,
            invoked = delivery.invoked,
            halted = delivery.halted,
            "push dispatched"
        );
        (delivery, None)
    }
}

// ============================================================================
// Gate
// ============================================================================

impl Dispatcher {
    /// Enable or disable pushing, returning the new state.
    ///
    /// Disabling also stops every push currently iterating, on any thread,
    /// before it visits its next listener.
    pub fn set_push_state(&self, enabled: bool) -> bool {
        let state = self.inner.gate.set(enabled);
        tracing::debug!(enabled = state, "push state changed");
        state
    }

    /// Whether pushing is currently enabled.
    pub fn push_state(&self) -> bool {
        self.inner.gate.is_enabled()
    }

    /// A handle to this dispatcher's gate.
    pub fn gate(&self) -> PushGate {
        self.inner.gate.clone()
    }
}

// ============================================================================
// Introspection
// ============================================================================

impl Dispatcher {
    /// Number of registered entries, duplicates included.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// Check if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// Whether `listener` is registered.
    pub fn contains(&self, listener: &ListenerHandle) -> bool {
        self.inner.registry.contains(listener)
    }

    /// Number of registered entries bound to `T`.
    pub fn listeners_for<T: Message>(&self) -> usize {
        self.inner.registry.count_for(&TypeTag::of::<T>())
    }

    /// The registered listeners, in visitation order.
    pub fn listeners(&self) -> Vec<ListenerHandle> {
        self.inner.registry.snapshot().iter().cloned().collect()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.inner.registry.len())
            .field("push_state", &self.inner.gate.state())
            .field("config", &self.inner.config)
            .finish()
    }
}

fn validate<I>(operation: &'static str, listeners: I) -> Result<Vec<ListenerHandle>, DispatchError>
where
    I: IntoIterator<Item = Option<ListenerHandle>>,
{
    listeners
        .into_iter()
        .enumerate()
        .map(|(index, handle)| handle.ok_or(DispatchError::InvalidArgument { operation, index }))
        .collect()
}

fn report(warnings: &[RegistrationWarning]) {
    for warning in warnings {
        tracing::warn!(
            listener = warning.listener(),
            reason = warning.as_label(),
            "{warning}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use typebus_core::{BoxError, on};

    fn counting<T: Message>(hits: &Arc<AtomicUsize>) -> ListenerHandle {
        let hits = hits.clone();
        on::<T>(move |_: &T| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_push_returns_value() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.register([counting::<String>(&hits)]);

        assert_eq!(bus.push(String::from("hello")), "hello");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_exact_type_only() {
        let bus = Dispatcher::new();
        let strings = Arc::new(AtomicUsize::new(0));
        let boxed = Arc::new(AtomicUsize::new(0));
        bus.register([counting::<String>(&strings), counting::<Box<String>>(&boxed)]);

        bus.push(String::from("a"));
        bus.push(Box::new(String::from("b")));
        bus.push("c");

        assert_eq!(strings.load(Ordering::SeqCst), 1);
        assert_eq!(boxed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_gate_fires_nobody() {
        let bus = Dispatcher::with_config(DispatcherConfig::new().with_push_state(false));
        let hits = Arc::new(AtomicUsize::new(0));
        bus.register([counting::<u32>(&hits)]);

        let (value, delivery) = bus.push_counted(1u32);
        assert_eq!(value, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(delivery.halted);
    }

    #[test]
    fn test_gate_stops_in_flight_push() {
        let bus = Dispatcher::new();
        let gate = bus.gate();
        let order = Arc::new(Mutex::new(Vec::new()));
        let (o1, o2) = (order.clone(), order.clone());

        bus.register([
            on::<u8>(move |_: &u8| {
                o1.lock().unwrap().push(1);
                gate.disable();
            }),
            on::<u8>(move |_: &u8| o2.lock().unwrap().push(2)),
        ]);

        let (_, delivery) = bus.push_counted(0u8);
        assert_eq!(*order.lock().unwrap(), vec![1]);
        assert!(delivery.halted);
        assert!(!bus.push_state());
    }

    #[test]
    fn test_failures_are_isolated() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.register([
            on::<u16>(|_: &u16| -> Result<(), BoxError> { Err("nope".into()) }),
            counting::<u16>(&hits),
        ]);

        let (_, delivery) = bus.push_counted(5u16);
        assert_eq!(delivery.invoked, 2);
        assert_eq!(delivery.failed, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_push_propagates_first_failure() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.register([
            on::<u16>(|_: &u16| -> Result<(), BoxError> { Err("nope".into()) }),
            counting::<u16>(&hits),
        ]);

        let err = bus.try_push(9u16).unwrap_err();
        assert_eq!(err.error().source.to_string(), "nope");
        assert_eq!(err.into_inner(), 9);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_capacity_warning() {
        let bus = Dispatcher::with_config(DispatcherConfig::new().with_capacity(1));
        let hits = Arc::new(AtomicUsize::new(0));
        let warnings = bus.register([counting::<u8>(&hits), counting::<u8>(&hits)]);

        assert_eq!(bus.len(), 1);
        assert!(matches!(
            warnings.as_slice(),
            [RegistrationWarning::CapacityExceeded { capacity: 1, .. }]
        ));
    }

    #[test]
    fn test_reject_duplicates() {
        let bus = Dispatcher::with_config(DispatcherConfig::new().with_reject_duplicates(true));
        let hits = Arc::new(AtomicUsize::new(0));
        let handle = counting::<u8>(&hits);
        let warnings = bus.register([handle.clone(), handle]);

        assert_eq!(bus.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].as_label(), "duplicate");
    }

    #[test]
    fn test_try_register_rejects_absent() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let err = bus
            .try_register([Some(counting::<u8>(&hits)), None])
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::InvalidArgument {
                operation: "register",
                index: 1
            }
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_unregister_every() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let handle = counting::<u8>(&hits);
        bus.register([handle.clone(), handle.clone(), handle.clone()]);

        assert_eq!(bus.unregister_every(&handle), 3);
        assert_eq!(bus.unregister_every(&handle), 0);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_push_dyn_uses_runtime_type() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.register([counting::<u64>(&hits)]);

        let values: Vec<Box<dyn Any + Send + Sync>> = vec![Box::new(1u64), Box::new(1u32)];
        let invoked: usize = values.iter().map(|v| bus.push_dyn(&**v)).sum();

        assert_eq!(invoked, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_push_dyn_failure_names_concrete_type() {
        let bus = Dispatcher::new();
        bus.register([on::<u64>(|_: &u64| -> Result<(), BoxError> {
            Err("nope".into())
        })]);

        let value: Box<dyn Any + Send + Sync> = Box::new(3u64);
        let (delivery, error) =
            bus.deliver(&*value, TypeTag::of_val(&*value), OnFailure::Propagate);

        assert_eq!(delivery.failed, 1);
        assert_eq!(error.unwrap().type_tag.name(), "u64");
        assert_eq!(bus.push_dyn(&*value), 1);
    }

    /// Unregisters `other` from `bus` when dropped.
    struct UnregisterOnDrop {
        bus: Dispatcher,
        other: ListenerHandle,
    }

    impl typebus_core::Listener<u8> for UnregisterOnDrop {
        fn event(&self, _value: &u8) -> Result<(), BoxError> {
            Ok(())
        }
    }

    impl Drop for UnregisterOnDrop {
        fn drop(&mut self) {
            self.bus.unregister([self.other.clone()]);
        }
    }

    #[test]
    fn test_listener_drop_may_reenter_after_unregister() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let other = counting::<u8>(&hits);
        let dropper = ListenerHandle::new::<u8, _>(UnregisterOnDrop {
            bus: bus.clone(),
            other: other.clone(),
        });
        bus.register([dropper.clone(), other.clone()]);

        // the registry holds the last reference once `dropper` is moved in
        assert!(bus.unregister([dropper]).is_empty());

        assert!(!bus.contains(&other));
        assert!(bus.is_empty());
    }

    #[test]
    fn test_listener_drop_may_reenter_after_clear() {
        let bus = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let other = counting::<u8>(&hits);
        bus.register([ListenerHandle::new::<u8, _>(UnregisterOnDrop {
            bus: bus.clone(),
            other: other.clone(),
        })]);

        bus.unregister_all();

        assert!(bus.is_empty());
        assert!(!bus.contains(&other));
    }
}
