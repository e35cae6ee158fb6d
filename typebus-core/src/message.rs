//! Message trait for pushed values.

/// A marker trait for values that can be pushed through a dispatcher.
///
/// Messages must be `Send + Sync + 'static` so that listeners can be shared
/// across threads and matched by [`TypeId`](std::any::TypeId).
///
/// Every such type is a `Message`; there is nothing to implement.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct UserJoined { id: u64 }
///
/// let joined = bus.push(UserJoined { id: 7 });
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be pushed through a dispatcher",
    label = "must be `Send + Sync + 'static`",
    note = "Pushed values are shared with listeners on any thread and matched by `TypeId`."
)]
pub trait Message: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Message for T {}
