use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::{
    NotifyError,
    binding::{Binding, Change, IntoValueCallback},
    owner::{Owner, OwnerHandle},
    registry::BindingRegistry,
};

/// Predicate over `(old, new)`; returning true skips the notification
pub type Suppressor<T> = Box<dyn Fn(&T, &T) -> bool + 'static>;

struct Inner<T> {
    value: RefCell<T>,
    suppressor: Option<Suppressor<T>>,
    registry: BindingRegistry<T>,
}

/// An observable value. Assigning a new value notifies every live subscriber, synchronously and in
/// registration order, unless the suppressor (if any) says the change is not worth reporting.
///
/// Subscriptions are keyed by an owner ([`Owner`]) which is held weakly: dropping the owner ends
/// its subscriptions without any call to [`unsubscribe`](Self::unsubscribe). Note that a callback
/// which captures its owner strongly keeps that owner alive for as long as the observable lives;
/// use [`Attach`](crate::Attach) to hand the callback its owner without retaining it.
///
/// Cloning an `Observable` creates another handle to the same value and subscriptions. Dropping
/// the last handle drops every subscription without notifying anyone.
///
/// Observables are `!Send` and `!Sync`; all mutation happens on one thread.
pub struct Observable<T>(Rc<Inner<T>>);

/// A weak handle to an [`Observable`]
pub struct WeakObservable<T>(Weak<Inner<T>>);

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> WeakObservable<T> {
    pub fn upgrade(&self) -> Option<Observable<T>> { self.0.upgrade().map(Observable) }
}

impl<T: PartialEq + 'static> Observable<T> {
    /// Create an observable that skips notifications when the new value equals the old one
    pub fn new(value: T) -> Self { Self::with_suppressor(value, |old: &T, new: &T| old == new) }
}

impl<T: 'static> Observable<T> {
    /// Create an observable with an optional suppressor
    pub fn from_parts(value: T, suppressor: Option<Suppressor<T>>) -> Self {
        Self(Rc::new(Inner { value: RefCell::new(value), suppressor, registry: BindingRegistry::new() }))
    }

    /// Create an observable that notifies on every assignment, including re-assignment of an equal value
    pub fn unsuppressed(value: T) -> Self { Self::from_parts(value, None) }

    /// Create an observable with a custom suppressor
    pub fn with_suppressor<F>(value: T, suppressor: F) -> Self
    where F: Fn(&T, &T) -> bool + 'static {
        Self::from_parts(value, Some(Box::new(suppressor)))
    }

    pub fn has_suppressor(&self) -> bool { self.0.suppressor.is_some() }

    /// Calls a closure with a borrow of the current value. The closure must not assign to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R { f(&self.0.value.borrow()) }

    pub fn downgrade(&self) -> WeakObservable<T> { WeakObservable(Rc::downgrade(&self.0)) }

    /// The registry backing this observable, for collaborators that deliver their own changes
    pub fn registry(&self) -> &BindingRegistry<T> { &self.0.registry }

    fn suppresses(&self, old: &T, new: &T) -> bool {
        match &self.0.suppressor {
            Some(suppressor) => suppressor(old, new),
            None => false,
        }
    }

    /// Register a callback for new values under `owner`
    pub fn subscribe<F>(&self, owner: impl Owner, callback: F) -> &Self
    where F: Fn(&T) + 'static {
        self.0.registry.register(owner, Binding::on_new(callback));
        self
    }

    /// Register anything convertible into a new-value callback, such as a channel sender
    pub fn listen<L>(&self, owner: impl Owner, listener: L) -> &Self
    where L: IntoValueCallback<T> {
        self.0.registry.register(owner, Binding::New(listener.into_value_callback()));
        self
    }

    /// Register a fallible callback for new values. An error aborts the notification and is
    /// returned from [`try_set`](Self::try_set).
    pub fn try_subscribe<F>(&self, owner: impl Owner, callback: F) -> &Self
    where F: Fn(&T) -> anyhow::Result<()> + 'static {
        self.0.registry.register(owner, Binding::New(Rc::new(callback)));
        self
    }

    /// Register a callback for the previous value. Only delivered by [`replace`](Self::replace)
    /// and by collaborators notifying the registry directly.
    pub fn subscribe_old<F>(&self, owner: impl Owner, callback: F) -> &Self
    where F: Fn(&T) + 'static {
        self.0.registry.register(owner, Binding::on_old(callback));
        self
    }

    /// Register a callback for `(old, new)` pairs. Only delivered by [`replace`](Self::replace)
    /// and by collaborators notifying the registry directly.
    pub fn subscribe_change<F>(&self, owner: impl Owner, callback: F) -> &Self
    where F: Fn(&T, &T) + 'static {
        self.0.registry.register(owner, Binding::on_change(callback));
        self
    }

    /// Remove every callback registered under `owner`. Returns whether there were any.
    pub fn unsubscribe(&self, owner: impl Owner) -> bool { self.0.registry.unregister(owner) }

    pub fn is_subscribed(&self, owner: impl Owner) -> bool { self.0.registry.contains(owner) }

    /// Number of live owners subscribed
    pub fn subscriber_count(&self) -> usize { self.0.registry.len() }
}

impl<T: Clone + 'static> Observable<T> {
    /// Returns a clone of the current value
    pub fn get(&self) -> T { self.0.value.borrow().clone() }

    /// Assign a new value and notify new-value subscribers unless suppressed.
    ///
    /// # Panics
    ///
    /// Panics if a fallible subscriber fails; use [`try_set`](Self::try_set) to handle that case.
    /// Panics raised by subscribers propagate unchanged.
    pub fn set(&self, value: T) {
        if let Err(err) = self.try_set(value) {
            panic!("observable notification failed: {err:#}");
        }
    }

    /// Assign a new value and notify new-value subscribers unless suppressed.
    ///
    /// The value is assigned before any subscriber runs and stays assigned if one fails.
    pub fn try_set(&self, value: T) -> Result<(), NotifyError> {
        let new = value.clone();
        let old = self.0.value.replace(value);
        self.changed(old, new)
    }

    /// Mutate the value in place, then notify exactly as [`set`](Self::set) would.
    ///
    /// The closure runs while the value is mutably borrowed and must not touch this observable.
    ///
    /// # Panics
    ///
    /// Panics if a fallible subscriber fails; see [`try_update`](Self::try_update).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        if let Err(err) = self.try_update(f) {
            panic!("observable notification failed: {err:#}");
        }
    }

    pub fn try_update(&self, f: impl FnOnce(&mut T)) -> Result<(), NotifyError> {
        let (old, new) = {
            let mut current = self.0.value.borrow_mut();
            let old = current.clone();
            f(&mut current);
            (old, current.clone())
        };
        self.changed(old, new)
    }

    fn changed(&self, old: T, new: T) -> Result<(), NotifyError> {
        if self.suppresses(&old, &new) {
            trace!("observable change suppressed");
            return Ok(());
        }
        self.0.registry.notify(Change::NewValue(new))
    }

    /// Assign a new value and deliver the combined change (old-value, then new-value, then
    /// old-and-new callbacks of each owner) unless suppressed. Returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics if a fallible subscriber fails; see [`try_replace`](Self::try_replace).
    pub fn replace(&self, value: T) -> T {
        match self.try_replace(value) {
            Ok(old) => old,
            Err(err) => panic!("observable notification failed: {err:#}"),
        }
    }

    pub fn try_replace(&self, value: T) -> Result<T, NotifyError> {
        let new = value.clone();
        let old = self.0.value.replace(value);
        if self.suppresses(&old, &new) {
            trace!("observable change suppressed");
            return Ok(old);
        }
        self.0.registry.notify(Change::OldAndNew(old.clone(), new))?;
        Ok(old)
    }

    /// Call `callback` with the current value, then subscribe it for new values
    pub fn subscribe_now<F>(&self, owner: impl Owner, callback: F) -> &Self
    where F: Fn(&T) + 'static {
        let current = self.get();
        callback(&current);
        self.subscribe(owner, callback)
    }
}

impl<T: 'static> Owner for Observable<T> {
    fn owner_handle(&self) -> OwnerHandle { self.0.owner_handle() }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.0.value.borrow())
            .field("has_suppressor", &self.has_suppressor())
            .field("registry", &self.0.registry)
            .finish()
    }
}

impl<T: std::fmt::Display + 'static> std::fmt::Display for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.with(|value| std::fmt::Display::fmt(value, f)) }
}
