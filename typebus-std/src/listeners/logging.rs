//! Logging Listener - Observability for pushed values.

use std::{borrow::Cow, fmt::Debug};
use typebus_core::{BoxError, Listener, Message};

/// A Listener that logs every value it receives.
///
/// Emits one `tracing` record at `DEBUG` per value, then succeeds. Register
/// one per type you want to observe.
///
/// # Example
///
/// ```rust,ignore
/// use typebus::{Dispatcher, ListenerHandle, listeners::LoggingListener};
///
/// let bus = Dispatcher::new();
/// bus.register([ListenerHandle::new::<UserJoined, _>(LoggingListener::named("joins"))]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingListener {
    name: &'static str,
}

impl LoggingListener {
    /// Create a new `LoggingListener` with a default name.
    pub fn new() -> Self {
        Self { name: "event" }
    }

    /// Create a new `LoggingListener` with a custom name.
    ///
    /// The name is used in log records and warnings to identify the listener.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listener<T> for LoggingListener
where
    T: Message + Debug,
{
    fn event(&self, value: &T) -> Result<(), BoxError> {
        tracing::debug!(
            name = %self.name,
            event_type = std::any::type_name::<T>(),
            value = ?value,
            "value pushed"
        );
        Ok(())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestEvent {
        #[allow(dead_code)]
        data: String,
    }

    #[test]
    fn test_logging_listener_succeeds() {
        let listener = LoggingListener::new();
        let event = TestEvent {
            data: "test".into(),
        };

        assert!(listener.event(&event).is_ok());
    }

    #[test]
    fn test_logging_listener_named() {
        let listener = LoggingListener::named("my_pipeline");
        assert_eq!(Listener::<u8>::name(&listener), "my_pipeline");
    }
}
