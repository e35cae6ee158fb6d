//! Standard listener implementations.
//!
//! [`Filter`](typebus_core::Filter) and [`Named`](typebus_core::Named) live in
//! `typebus-core` as combinators on [`Listener`](typebus_core::Listener).

pub mod logging;

pub use logging::LoggingListener;
