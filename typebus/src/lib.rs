//! # typebus - Typed Synchronous Dispatch
//!
//! `typebus` delivers values to the listeners registered for their exact
//! type. Pushing is synchronous: every matching listener runs on the calling
//! thread, in registration order, before `push` returns the value to you.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typebus::prelude::*;
//!
//! struct UserJoined { id: u64 }
//!
//! let bus = Dispatcher::new();
//! let audit = on::<UserJoined>(|joined: &UserJoined| println!("joined: {}", joined.id));
//!
//! bus.register([audit.clone()]);
//! let joined = bus.push(UserJoined { id: 7 });
//!
//! bus.set_push_state(false); // pause delivery
//! bus.unregister([audit]);
//! ```
//!
//! ## Matching
//!
//! A listener registered for `T` receives values whose concrete type is
//! exactly `T`. `Box<T>`, `&'static T` and `Arc<T>` are different types and
//! reach different listeners.
//!
//! ## Shared Instance
//!
//! [`global()`] returns a process-wide [`Dispatcher`], for code that wants one
//! implicit bus instead of passing a handle around.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use typebus_core::{
    // Errors
    BoxError,
    DispatchError,
    // Listener
    DynListener,
    Filter,
    IntoOutcome,
    Listener,
    ListenerError,
    ListenerHandle,
    // Message
    Message,
    Named,
    PushError,
    RegistrationWarning,
    TypeTag,
    on,
};

// Dispatcher
pub use typebus_std::{
    Delivery, Dispatcher, DispatcherConfig, GateState, PushGate, Registry, Snapshot, global,
};

/// Standard listener implementations.
pub mod listeners {
    #![allow(clippy::wildcard_imports)]
    pub use typebus_std::listeners::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use typebus_std::testing::*;
}

/// Prelude module - common imports for typebus.
///
/// # Usage
///
/// ```rust,ignore
/// use typebus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Delivery, DispatchError, Dispatcher, DispatcherConfig, Listener,
        ListenerHandle, Message, PushError, RegistrationWarning, global, on,
    };
}

#[cfg(feature = "macros")]
pub use typebus_macros::{listener, subscribe};

#[cfg(feature = "inventory")]
pub use inventory;
#[cfg(feature = "inventory")]
pub use typebus_std::CollectedListener;
