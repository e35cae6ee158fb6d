//! Testing utilities for typebus.
//!
//! This module provides listeners that make it easy to assert what a
//! dispatcher delivered, and in what order.
//!
//! # Features
//!
//! - [`RecordingListener`]: records a clone of every value it receives
//! - [`CountingListener`]: counts invocations
//! - [`FailingListener`]: always returns an error
//! - [`OrderProbe`]: shared log of which listener fired when

use parking_lot::Mutex;
use std::{
    borrow::Cow,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use typebus_core::{BoxError, Listener, Message};

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records all values it receives.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::<String>::new();
/// bus.register([ListenerHandle::new::<String, _>(recorder.clone())]);
///
/// bus.push(String::from("hello"));
/// assert_eq!(recorder.values(), vec!["hello".to_string()]);
/// ```
pub struct RecordingListener<T: Clone> {
    values: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> RecordingListener<T> {
    /// Create a new, empty recorder.
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded values.
    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    /// Get the number of recorded values.
    pub fn count(&self) -> usize {
        self.values.lock().len()
    }

    /// Clear all recorded values.
    pub fn clear(&self) {
        self.values.lock().clear();
    }
}

impl<T: Clone> Default for RecordingListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RecordingListener<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T: Message + Clone> Listener<T> for RecordingListener<T> {
    fn event(&self, value: &T) -> Result<(), BoxError> {
        self.values.lock().push(value.clone());
        Ok(())
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations, for any value type.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counting listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<T: Message> Listener<T> for CountingListener {
    fn event(&self, _value: &T) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Listener
// ============================================================================

/// A listener that fails on every value, counting its attempts.
#[derive(Clone)]
pub struct FailingListener {
    message: &'static str,
    attempts: Arc<AtomicUsize>,
}

impl FailingListener {
    /// Create a listener failing with `message`.
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times the listener was invoked.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl<T: Message> Listener<T> for FailingListener {
    fn event(&self, _value: &T) -> Result<(), BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.message.into())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("failing")
    }
}

// ============================================================================
// Order Probe
// ============================================================================

/// A shared log of listener invocations, for ordering assertions.
///
/// # Example
///
/// ```rust,ignore
/// let probe = OrderProbe::new();
/// bus.register([
///     ListenerHandle::new::<u8, _>(probe.listener("first")),
///     ListenerHandle::new::<u8, _>(probe.listener("second")),
/// ]);
/// bus.push(0u8);
/// assert_eq!(probe.order(), vec!["first", "second"]);
/// ```
#[derive(Clone, Default)]
pub struct OrderProbe {
    order: Arc<Mutex<Vec<&'static str>>>,
}

impl OrderProbe {
    /// Create a new, empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that appends `label` to the probe when invoked.
    pub fn listener(&self, label: &'static str) -> ProbeListener {
        ProbeListener {
            label,
            order: self.order.clone(),
        }
    }

    /// The labels recorded so far, in invocation order.
    pub fn order(&self) -> Vec<&'static str> {
        self.order.lock().clone()
    }
}

/// A listener created by [`OrderProbe::listener`].
#[derive(Clone)]
pub struct ProbeListener {
    label: &'static str,
    order: Arc<Mutex<Vec<&'static str>>>,
}

impl<T: Message> Listener<T> for ProbeListener {
    fn event(&self, _value: &T) -> Result<(), BoxError> {
        self.order.lock().push(self.label);
        Ok(())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.label)
    }
}
