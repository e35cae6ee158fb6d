//! Type tokens used for exact-type matching.

use crate::message::Message;
use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// An identifier for the exact type a listener is bound to.
///
/// Two tags are equal only when they describe the same concrete type. There is
/// no notion of supertype: `Box<T>`, `Arc<T>` and `T` all produce distinct tags.
///
/// The type name is carried for diagnostics only and takes no part in
/// equality or hashing.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// The tag of `T`.
    pub fn of<T: Message>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The tag of the concrete type behind a type-erased reference.
    ///
    /// The name is not recoverable at runtime and is reported as
    /// `"<dyn Any>"`.
    pub fn of_val(value: &(dyn Any + Send + Sync)) -> Self {
        Self {
            id: value.type_id(),
            name: "<dyn Any>",
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The Rust type name, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this tag describes `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeTag").field(&self.name).finish()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
