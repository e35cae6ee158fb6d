//! Error types for typebus.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DispatchError`] - Caller errors surfaced synchronously by dispatcher operations
//! - [`ListenerError`] - A failure returned by a single listener during a push
//! - [`PushError`] - A propagated listener failure that still owns the pushed value
//! - [`RegistrationWarning`] - Non-fatal registry outcomes, reported rather than thrown

use crate::tag::TypeTag;
use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced synchronously to the caller of a dispatcher operation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// An absent listener was supplied where one is required.
    #[error("{operation}: no listener supplied at position {index}")]
    InvalidArgument {
        /// The operation that rejected the batch.
        operation: &'static str,
        /// Position of the absent entry in the batch.
        index: usize,
    },
}

/// A failure returned by one listener while handling a pushed value.
#[derive(Error, Debug)]
#[error("listener `{listener}` failed on `{type_tag}`")]
pub struct ListenerError {
    /// Diagnostic name of the failing listener.
    pub listener: String,
    /// The type the listener is bound to.
    pub type_tag: TypeTag,
    /// The error returned by the listener.
    #[source]
    pub source: BoxError,
}

/// A propagated listener failure from `Dispatcher::try_push`.
///
/// The pushed value is handed back so the caller never loses it.
#[derive(Error)]
#[error("push aborted: {error}")]
pub struct PushError<T> {
    value: T,
    #[source]
    error: ListenerError,
}

impl<T> PushError<T> {
    /// Create a new push error owning `value`.
    pub fn new(value: T, error: ListenerError) -> Self {
        Self { value, error }
    }

    /// The listener failure that aborted the push.
    pub fn error(&self) -> &ListenerError {
        &self.error
    }

    /// A reference to the pushed value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Recover the pushed value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Split into the pushed value and the listener failure.
    pub fn into_parts(self) -> (T, ListenerError) {
        (self.value, self.error)
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Non-fatal outcome of a registry mutation.
///
/// Warnings are logged by the dispatcher and returned to the caller; they
/// never abort the remainder of a batch.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationWarning {
    /// The registry is full.
    #[error("failed to add listener `{listener}`: capacity {capacity} reached")]
    CapacityExceeded {
        /// Diagnostic name of the rejected listener.
        listener: String,
        /// The configured capacity.
        capacity: usize,
    },

    /// The listener is already registered and duplicates are rejected.
    #[error("failed to add listener `{listener}`: already registered")]
    Duplicate {
        /// Diagnostic name of the rejected listener.
        listener: String,
    },

    /// The listener was not registered.
    #[error("failed to remove listener `{listener}`: not registered")]
    NotRegistered {
        /// Diagnostic name of the listener.
        listener: String,
    },
}

impl RegistrationWarning {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationWarning::CapacityExceeded { .. } => "capacity_exceeded",
            RegistrationWarning::Duplicate { .. } => "duplicate",
            RegistrationWarning::NotRegistered { .. } => "not_registered",
        }
    }

    /// Diagnostic name of the listener concerned.
    pub fn listener(&self) -> &str {
        match self {
            RegistrationWarning::CapacityExceeded { listener, .. }
            | RegistrationWarning::Duplicate { listener }
            | RegistrationWarning::NotRegistered { listener } => listener,
        }
    }
}
