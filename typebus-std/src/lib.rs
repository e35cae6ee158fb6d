//! # typebus-std
//!
//! Standard implementations for the typebus typed dispatcher.
//!
//! This crate provides:
//! - **Dispatcher**: [`Dispatcher`], its [`Registry`] and [`PushGate`]
//! - **Configuration**: [`DispatcherConfig`]
//! - **Shared instance**: [`global()`]
//! - **Standard listeners**: Logging
//! - **Testing**: recording and counting listeners
//! - **Collected listeners**: [`CollectedListener`] (feature `inventory`)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use typebus_core;

// Modules
pub mod config;
pub mod dispatcher;
pub mod gate;
pub mod global;
pub mod listeners;
pub mod registry;
pub mod testing;

#[cfg(feature = "inventory")]
pub mod collected;

pub use config::DispatcherConfig;
pub use dispatcher::{Delivery, Dispatcher};
pub use gate::{GateState, PushGate};
pub use global::global;
pub use registry::{Registry, Snapshot};

#[cfg(feature = "inventory")]
pub use collected::CollectedListener;
#[cfg(feature = "inventory")]
pub use inventory;
