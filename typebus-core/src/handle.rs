//! Type-erased listener handles.
//!
//! A [`ListenerHandle`] is what a dispatcher stores. It captures the
//! listener's [`TypeTag`] once, at construction, and gives the listener an
//! identity: two handles are equal only if one was cloned from the other.
//! Registering or unregistering is always done by identity, never by type.

use crate::{error::BoxError, listener::Listener, message::Message, tag::TypeTag};
use std::{
    any::Any,
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::Arc,
};

/// Object-safe version of [`Listener`] for dynamic dispatch.
pub trait DynListener: Send + Sync + 'static {
    /// The type this listener is bound to.
    fn type_tag(&self) -> TypeTag;

    /// Diagnostic name used in logs and warnings.
    fn name(&self) -> Cow<'static, str>;

    /// Handle a type-erased value.
    ///
    /// Values whose concrete type differs from [`type_tag`](Self::type_tag)
    /// are ignored.
    fn event_dyn(&self, value: &(dyn Any + Send + Sync)) -> Result<(), BoxError>;
}

/// Adapter binding a [`Listener<T>`] to its type for erasure.
struct Typed<T, L> {
    listener: L,
    _marker: PhantomData<fn(&T)>,
}

impl<T, L> DynListener for Typed<T, L>
where
    T: Message,
    L: Listener<T>,
{
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn name(&self) -> Cow<'static, str> {
        self.listener.name()
    }

    fn event_dyn(&self, value: &(dyn Any + Send + Sync)) -> Result<(), BoxError> {
        match value.downcast_ref::<T>() {
            Some(value) => self.listener.event(value),
            None => Ok(()),
        }
    }
}

/// A shared, identity-bearing reference to a listener.
///
/// Cloning is cheap (an `Arc` bump) and preserves identity, so the clone you
/// keep can later be passed to `unregister`.
///
/// # Example
///
/// ```rust,ignore
/// let audit = ListenerHandle::new::<UserJoined, _>(|joined: &UserJoined| {
///     println!("joined: {}", joined.id);
/// });
///
/// bus.register([audit.clone()]);
/// // ...
/// bus.unregister([audit]);
/// ```
#[derive(Clone)]
pub struct ListenerHandle {
    tag: TypeTag,
    inner: Arc<dyn DynListener>,
}

impl ListenerHandle {
    /// Wrap a listener for values of type `T`.
    pub fn new<T, L>(listener: L) -> Self
    where
        T: Message,
        L: Listener<T>,
    {
        Self::from_dyn(Arc::new(Typed {
            listener,
            _marker: PhantomData::<fn(&T)>,
        }))
    }

    /// Wrap an already type-erased listener.
    pub fn from_dyn(inner: Arc<dyn DynListener>) -> Self {
        Self {
            tag: inner.type_tag(),
            inner,
        }
    }

    /// The type this listener is bound to.
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Whether this listener receives values of the given type.
    #[inline]
    pub fn accepts(&self, tag: &TypeTag) -> bool {
        self.tag == *tag
    }

    /// Diagnostic name used in logs and warnings.
    pub fn name(&self) -> Cow<'static, str> {
        self.inner.name()
    }

    /// Invoke the listener with a value of its type.
    pub fn event<T: Message>(&self, value: &T) -> Result<(), BoxError> {
        self.inner.event_dyn(value)
    }

    /// Invoke the listener with a type-erased value.
    pub fn event_dyn(&self, value: &(dyn Any + Send + Sync)) -> Result<(), BoxError> {
        self.inner.event_dyn(value)
    }

    /// Whether two handles refer to the same listener instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

/// Wrap a listener for values of type `T` in a handle.
///
/// Shorthand for [`ListenerHandle::new`].
///
/// ```rust,ignore
/// bus.register([on::<String>(|s: &String| println!("{s}"))]);
/// ```
pub fn on<T: Message>(listener: impl Listener<T>) -> ListenerHandle {
    ListenerHandle::new::<T, _>(listener)
}

impl PartialEq for ListenerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ListenerHandle {}

impl Hash for ListenerHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as *const ()).hash(state);
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("name", &self.name())
            .field("type", &self.tag)
            .finish()
    }
}

impl fmt::Display for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name(), self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_identity_survives_clone() {
        let a = on::<u32>(|_: &u32| {});
        let b = a.clone();
        let c = on::<u32>(|_: &u32| {});

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_type_tag_captured() {
        let handle = on::<String>(|_: &String| {});
        assert!(handle.accepts(&TypeTag::of::<String>()));
        assert!(!handle.accepts(&TypeTag::of::<&'static str>()));
    }

    #[test]
    fn test_event_dyn_ignores_other_types() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let handle = on::<u32>(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.event_dyn(&7u64).unwrap();
        handle.event_dyn(&7u32).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_named_handle_display() {
        let handle = ListenerHandle::new::<u8, _>(Listener::<u8>::named(|_: &u8| {}, "audit"));
        assert_eq!(handle.name(), "audit");
        assert_eq!(handle.to_string(), "audit<u8>");
    }
}
