//! # typebus-core
//!
//! Core traits for the typebus typed dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! libraries that only define listeners or events and don't need the
//! `typebus-std` dispatcher.
//!
//! # Vocabulary
//!
//! - [`Message`]: anything that can be pushed (`Send + Sync + 'static`)
//! - [`Listener`]: an observer bound to exactly one value type
//! - [`TypeTag`]: the exact-type token listeners are matched by
//! - [`ListenerHandle`]: a type-erased, identity-bearing listener reference
//!
//! # Error Types
//!
//! - [`DispatchError`] - Caller errors
//! - [`ListenerError`] / [`PushError`] - Listener failures
//! - [`RegistrationWarning`] - Non-fatal registry outcomes

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handle;
mod listener;
mod message;
mod outcome;
mod tag;

// Re-exports
pub use error::{BoxError, DispatchError, ListenerError, PushError, RegistrationWarning};
pub use handle::{DynListener, ListenerHandle, on};
pub use listener::{Filter, Listener, Named};
pub use message::Message;
pub use outcome::IntoOutcome;
pub use tag::TypeTag;
