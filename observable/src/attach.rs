use std::rc::Rc;

use crate::Observable;

/// Subscribe an object to an observable under its own identity.
///
/// The callback is handed the owner on each notification but does not keep it alive; once the
/// owner is dropped the binding goes inert.
pub trait Attach {
    type Target: ?Sized;

    fn attach<T, F>(&self, observable: &Observable<T>, callback: F)
    where
        T: 'static,
        F: Fn(&Self::Target, &T) + 'static;

    /// Remove everything this owner registered on `observable`
    fn detach<T: 'static>(&self, observable: &Observable<T>) -> bool;
}

impl<O: 'static> Attach for Rc<O> {
    type Target = O;

    fn attach<T, F>(&self, observable: &Observable<T>, callback: F)
    where
        T: 'static,
        F: Fn(&Self::Target, &T) + 'static,
    {
        let owner = Rc::downgrade(self);
        observable.subscribe(self, move |value: &T| {
            if let Some(owner) = owner.upgrade() {
                callback(&owner, value);
            }
        });
    }

    fn detach<T: 'static>(&self, observable: &Observable<T>) -> bool { observable.unsubscribe(self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Label {
        text: RefCell<String>,
    }

    #[test]
    fn test_attach_hands_owner_to_callback() {
        let count = Observable::new(0);
        let label = Rc::new(Label { text: RefCell::new(String::new()) });

        label.attach(&count, |label: &Label, value: &i32| *label.text.borrow_mut() = format!("count: {value}"));
        count.set(3);
        assert_eq!(*label.text.borrow(), "count: 3");

        assert!(label.detach(&count));
        count.set(4);
        assert_eq!(*label.text.borrow(), "count: 3");
    }

    #[test]
    fn test_attach_does_not_retain_owner() {
        let count = Observable::new(0);
        let label = Rc::new(Label { text: RefCell::new(String::new()) });
        let weak = Rc::downgrade(&label);

        label.attach(&count, |label: &Label, value: &i32| *label.text.borrow_mut() = value.to_string());
        drop(label);

        assert!(weak.upgrade().is_none());
        count.set(1);
        assert_eq!(count.subscriber_count(), 0);
    }
}
