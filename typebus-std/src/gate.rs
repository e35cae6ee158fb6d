//! The push gate.
//!
//! A single enabled/disabled flag per dispatcher. While disabled, no push
//! begins dispatch, and every push still iterating (on any thread) stops before
//! visiting its next listener. The gate never touches the registry.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// The two states of a [`PushGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Pushes dispatch to listeners.
    Enabled,
    /// Pushes return immediately; in-flight pushes stop early.
    Disabled,
}

impl From<bool> for GateState {
    fn from(enabled: bool) -> Self {
        if enabled {
            GateState::Enabled
        } else {
            GateState::Disabled
        }
    }
}

impl From<GateState> for bool {
    fn from(state: GateState) -> Self {
        state == GateState::Enabled
    }
}

/// A shareable handle to a dispatcher's enabled/disabled flag.
///
/// Clones observe and control the same flag, so a handle can be given to code
/// that should be able to halt dispatch without holding the dispatcher.
#[derive(Debug, Clone)]
pub struct PushGate(Arc<AtomicBool>);

impl PushGate {
    /// Create a new gate with the given initial state.
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Check if pushes are currently allowed.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// The current state.
    pub fn state(&self) -> GateState {
        self.is_enabled().into()
    }

    /// Set the gate, returning the new state.
    pub fn set(&self, enabled: bool) -> bool {
        self.0.store(enabled, Ordering::Release);
        enabled
    }

    /// Allow pushes.
    pub fn enable(&self) {
        self.set(true);
    }

    /// Halt pushes, including those in flight.
    pub fn disable(&self) {
        self.set(false);
    }

    /// Toggle the gate, returning the new state.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

impl Default for PushGate {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enabled() {
        let gate = PushGate::default();
        assert!(gate.is_enabled());
        assert_eq!(gate.state(), GateState::Enabled);
    }

    #[test]
    fn test_set_returns_new_state() {
        let gate = PushGate::default();
        assert!(!gate.set(false));
        assert!(!gate.set(false));
        assert_eq!(gate.state(), GateState::Disabled);
        assert!(gate.set(true));
    }

    #[test]
    fn test_clones_share_state() {
        let gate = PushGate::default();
        let remote = gate.clone();
        remote.disable();
        assert!(!gate.is_enabled());
        assert!(gate.toggle());
        assert!(remote.is_enabled());
    }
}
