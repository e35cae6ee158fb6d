//! Dispatcher configuration.

/// Settings for a [`Dispatcher`](crate::Dispatcher).
///
/// # Defaults
///
/// | Field                | Default | Meaning                                       |
/// |----------------------|---------|-----------------------------------------------|
/// | `initial_push_state` | `true`  | Gate state at construction                    |
/// | `capacity`           | `None`  | Unbounded registry                            |
/// | `reject_duplicates`  | `false` | The same handle may be registered many times  |
///
/// # Example
///
/// ```rust,ignore
/// let cfg = DispatcherConfig::new()
///     .with_capacity(1024)
///     .with_reject_duplicates(true);
/// let bus = Dispatcher::with_config(cfg);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Whether the push gate starts enabled.
    pub initial_push_state: bool,
    /// Maximum number of registered listeners; `None` is unbounded.
    pub capacity: Option<usize>,
    /// Reject registering a handle that is already registered.
    pub reject_duplicates: bool,
}

impl DispatcherConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            initial_push_state: true,
            capacity: None,
            reject_duplicates: false,
        }
    }

    /// Set the initial gate state.
    pub fn with_push_state(mut self, enabled: bool) -> Self {
        self.initial_push_state = enabled;
        self
    }

    /// Bound the registry.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Reject duplicate registrations.
    pub fn with_reject_duplicates(mut self, reject: bool) -> Self {
        self.reject_duplicates = reject;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::new()
    }
}
