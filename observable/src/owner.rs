use std::any::Any;
use std::rc::{Rc, Weak};

/// A non-owning handle to the object a binding is registered under.
///
/// Identity is allocation identity: two owners compare equal only if they are the same `Rc`
/// allocation, regardless of their contents. Holding an `OwnerHandle` never keeps the owner alive,
/// but it does keep the allocation's address reserved, so a dead handle can never be mistaken for
/// a new owner that happens to land at the same address.
#[derive(Clone)]
pub struct OwnerHandle(Weak<dyn Any>);

impl OwnerHandle {
    /// Whether the owner still has at least one strong reference
    pub fn is_alive(&self) -> bool { self.0.strong_count() > 0 }

    /// Same allocation, alive or not
    pub fn same_owner(&self, other: &OwnerHandle) -> bool { Weak::ptr_eq(&self.0, &other.0) }

    /// Address of the owner allocation, for logging only
    pub fn id(&self) -> usize { self.0.as_ptr() as *const () as usize }
}

impl std::fmt::Debug for OwnerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerHandle").field("id", &format_args!("{:#x}", self.id())).field("alive", &self.is_alive()).finish()
    }
}

impl PartialEq for OwnerHandle {
    fn eq(&self, other: &Self) -> bool { self.same_owner(other) }
}
impl Eq for OwnerHandle {}

/// Anything that can be used as the key of a binding
pub trait Owner {
    fn owner_handle(&self) -> OwnerHandle;
}

impl<O: Any> Owner for Rc<O> {
    fn owner_handle(&self) -> OwnerHandle {
        let weak: Weak<O> = Rc::downgrade(self);
        OwnerHandle(weak)
    }
}

impl Owner for OwnerHandle {
    fn owner_handle(&self) -> OwnerHandle { self.clone() }
}

impl<O: Owner + ?Sized> Owner for &O {
    fn owner_handle(&self) -> OwnerHandle { (**self).owner_handle() }
}

/// An identity token for owners that are not themselves reference counted.
///
/// Embed one in a struct and subscribe with it; the bindings go inert when the token is dropped.
/// Clones share the same identity.
#[derive(Clone, Default)]
pub struct OwnerToken(Rc<()>);

impl OwnerToken {
    pub fn new() -> Self { Self(Rc::new(())) }
}

impl Owner for OwnerToken {
    fn owner_handle(&self) -> OwnerHandle { self.0.owner_handle() }
}

impl std::fmt::Debug for OwnerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "OwnerToken({:#x})", self.owner_handle().id()) }
}
