use std::cell::RefCell;

use tracing::{debug, trace, warn};

use crate::{
    NotifyError,
    binding::{Binding, BindingBundle, Change},
    owner::{Owner, OwnerHandle},
};

struct Entry<T> {
    owner: OwnerHandle,
    bundle: BindingBundle<T>,
}

/// Maps owners (held weakly) to their binding bundles (held strongly).
///
/// Entries stay in insertion order. An entry whose owner has been dropped is inert: it is skipped
/// by [`notify`](Self::notify) and removed by the next sweep, which runs on every register, unregister
/// and notify.
///
/// The registry is not thread safe and is never shared across threads; every method takes `&self`
/// so that callbacks may re-enter it during a notification.
pub struct BindingRegistry<T> {
    entries: RefCell<Vec<Entry<T>>>,
}

impl<T> Default for BindingRegistry<T> {
    fn default() -> Self { Self::new() }
}

impl<T> BindingRegistry<T> {
    pub fn new() -> Self { Self { entries: RefCell::new(Vec::new()) } }

    /// Append a callback to the owner's bundle, creating the bundle on first use
    pub fn register(&self, owner: impl Owner, binding: Binding<T>) {
        let owner = owner.owner_handle();
        let category = binding.category();
        let mut entries = self.entries.borrow_mut();
        sweep_entries(&mut entries);

        match entries.iter_mut().find(|entry| entry.owner.same_owner(&owner)) {
            Some(entry) => entry.bundle.push(binding),
            None => {
                let mut bundle = BindingBundle::default();
                bundle.push(binding);
                entries.push(Entry { owner: owner.clone(), bundle });
            }
        }
        trace!("registered {category} binding for owner {:#x} ({} owners)", owner.id(), entries.len());
    }

    /// Remove the owner's bundle. Returns whether there was one.
    pub fn unregister(&self, owner: impl Owner) -> bool {
        let owner = owner.owner_handle();
        let mut entries = self.entries.borrow_mut();
        sweep_entries(&mut entries);

        let before = entries.len();
        entries.retain(|entry| !entry.owner.same_owner(&owner));
        let removed = entries.len() != before;
        trace!("unregister owner {:#x}: removed = {removed}", owner.id());
        removed
    }

    /// Whether a live owner has a bundle here
    pub fn contains(&self, owner: impl Owner) -> bool {
        let owner = owner.owner_handle();
        self.entries.borrow().iter().any(|entry| entry.owner.is_alive() && entry.owner.same_owner(&owner))
    }

    /// Number of live owners
    pub fn len(&self) -> usize { self.entries.borrow().iter().filter(|entry| entry.owner.is_alive()).count() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Drop the entries of owners that no longer exist. Returns how many were dropped.
    pub fn sweep(&self) -> usize { sweep_entries(&mut self.entries.borrow_mut()) }

    /// Deliver a change to every live owner, in registration order.
    ///
    /// Bundles are snapshotted before any callback runs, so callbacks may register, unregister
    /// or trigger further notifications; those take effect from the next notification. The first
    /// failing callback aborts the notification and its error is returned.
    pub fn notify(&self, change: Change<T>) -> Result<(), NotifyError> {
        let bundles: Vec<(OwnerHandle, BindingBundle<T>)> = {
            let mut entries = self.entries.borrow_mut();
            sweep_entries(&mut entries);
            entries.iter().map(|entry| (entry.owner.clone(), entry.bundle.clone())).collect()
        };
        trace!("notifying {} owners", bundles.len());

        for (owner, bundle) in bundles {
            // The owner may have been dropped by an earlier callback of this notification
            if !owner.is_alive() {
                continue;
            }
            if let Err(err) = bundle.fire(&change) {
                warn!("notification aborted at owner {:#x}: {err}", owner.id());
                return Err(err);
            }
        }
        Ok(())
    }
}

fn sweep_entries<T>(entries: &mut Vec<Entry<T>>) -> usize {
    let before = entries.len();
    entries.retain(|entry| entry.owner.is_alive());
    let swept = before - entries.len();
    if swept > 0 {
        debug!("swept {swept} bindings of dropped owners");
    }
    swept
}

impl<T> std::fmt::Debug for BindingRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.borrow();
        f.debug_struct("BindingRegistry").field("entries", &entries.len()).field("live", &entries.iter().filter(|e| e.owner.is_alive()).count()).finish()
    }
}
