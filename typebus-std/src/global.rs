//! The process-wide dispatcher.
//!
//! Most code should construct and pass around its own [`Dispatcher`]. The
//! global instance exists for callers that want a single ambient registry
//! shared by every part of the process.

use crate::dispatcher::Dispatcher;
use lazy_static::lazy_static;

lazy_static! {
    static ref GLOBAL: Dispatcher = Dispatcher::new();
}

/// The process-wide dispatcher.
///
/// Created with the default configuration on first use and never torn down.
/// It shares nothing with dispatchers constructed explicitly.
pub fn global() -> &'static Dispatcher {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    fn test_global_independent_of_local() {
        let local = Dispatcher::new();
        local.set_push_state(false);
        assert!(global().push_state());
    }
}
