//! # Listener
//!
//! A Listener is an observer bound to exactly one value type. The dispatcher
//! invokes it for every pushed value whose concrete type is that type, and for
//! nothing else.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|value: &UserJoined| { ... }`
//! 2. **Fallible closure**: `|value: &UserJoined| -> Result<(), BoxError> { ... }`
//! 3. **Struct implementation**: `impl Listener<UserJoined> for AuditLog`
//!
//! Combinators such as [`Listener::filter`] and [`Listener::named`] wrap an
//! existing listener without changing the type it is bound to.

use crate::{error::BoxError, handle::ListenerHandle, message::Message, outcome::IntoOutcome};
use std::borrow::Cow;

/// An observer of pushed values of type `T`.
///
/// The callback may do anything, including registering or unregistering
/// listeners and toggling the push gate on the dispatcher that invoked it.
/// The dispatcher makes no atomicity guarantee around a listener's side
/// effects.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener` for `{T}`",
    label = "missing `Listener<{T}>` implementation",
    note = "Implement `Listener<{T}>`, or use a closure `Fn(&{T})` returning `()` or `Result<(), E>`."
)]
pub trait Listener<T: Message>: Send + Sync + 'static {
    /// Handle a pushed value.
    fn event(&self, value: &T) -> Result<(), BoxError>;

    /// Diagnostic name used in logs and warnings.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Only forward values matching `predicate`.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Filter {
            listener: self,
            predicate,
        }
    }

    /// Override the diagnostic name.
    fn named(self, name: impl Into<Cow<'static, str>>) -> Named<Self>
    where
        Self: Sized,
    {
        Named {
            listener: self,
            name: name.into(),
        }
    }

    /// Wrap the listener in a type-erased, identity-bearing handle.
    fn into_handle(self) -> ListenerHandle
    where
        Self: Sized,
    {
        ListenerHandle::new::<T, Self>(self)
    }
}

// Blanket impl for closures
impl<F, T, R> Listener<T> for F
where
    T: Message,
    R: IntoOutcome,
    F: Fn(&T) -> R + Send + Sync + 'static,
{
    fn event(&self, value: &T) -> Result<(), BoxError> {
        (self)(value).into_outcome()
    }
}

/// A listener that only sees values accepted by a predicate.
pub struct Filter<L, P> {
    listener: L,
    predicate: P,
}

impl<L, P, T> Listener<T> for Filter<L, P>
where
    T: Message,
    L: Listener<T>,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn event(&self, value: &T) -> Result<(), BoxError> {
        if (self.predicate)(value) {
            self.listener.event(value)
        } else {
            Ok(())
        }
    }

    fn name(&self) -> Cow<'static, str> {
        self.listener.name()
    }
}

/// A listener with an explicit diagnostic name.
pub struct Named<L> {
    listener: L,
    name: Cow<'static, str>,
}

impl<L, T> Listener<T> for Named<L>
where
    T: Message,
    L: Listener<T>,
{
    fn event(&self, value: &T) -> Result<(), BoxError> {
        self.listener.event(value)
    }

    fn name(&self) -> Cow<'static, str> {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn test_closure_listener() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let listener = move |_: &String| {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        Listener::<String>::event(&listener, &"a".to_string()).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fallible_closure_listener() {
        let listener = |value: &u32| -> Result<(), BoxError> {
            if *value == 0 {
                return Err("zero".into());
            }
            Ok(())
        };

        assert!(Listener::<u32>::event(&listener, &1).is_ok());
        let err = Listener::<u32>::event(&listener, &0).unwrap_err();
        assert_eq!(err.to_string(), "zero");
    }

    #[test]
    fn test_filter_skips_rejected_values() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let listener = Listener::<u32>::filter(
            move |_: &u32| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |value: &u32| value % 2 == 0,
        );

        for value in 0..5u32 {
            listener.event(&value).unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_named_overrides_name() {
        let listener = Listener::<u32>::named(|_: &u32| {}, "audit");
        assert_eq!(Listener::<u32>::name(&listener), "audit");
    }
}
