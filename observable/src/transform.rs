use crate::Observable;

impl<T: Clone + 'static> Observable<T> {
    /// Derive an observable holding `transform(value)`.
    ///
    /// The derived observable suppresses equal values and subscribes itself, as owner, to `self`:
    /// every change delivered here recomputes and assigns the mapped value, which in turn notifies
    /// the derived observable's own subscribers. Chains may be arbitrarily deep. Cycles are not
    /// detected.
    ///
    /// `self` holds the derived observable only weakly. Once every handle to the derived
    /// observable is dropped, the mapping stops running and its entry is swept.
    ///
    /// A failure among the derived observable's subscribers fails the source notification.
    pub fn transform<U, F>(&self, transform: F) -> Observable<U>
    where
        U: PartialEq + Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let derived = Observable::new(self.with(|value| transform(value)));
        let weak_derived = derived.downgrade();
        let weak_source = self.downgrade();
        // Map the source's value at the time this runs, not the delivered one: a re-entrant set
        // earlier in the same notification may already have moved the source on.
        self.try_subscribe(&derived, move |_: &T| -> anyhow::Result<()> {
            if let (Some(source), Some(derived)) = (weak_source.upgrade(), weak_derived.upgrade()) {
                derived.try_set(source.with(|value| transform(value)))?;
            }
            Ok(())
        });
        derived
    }
}

#[cfg(test)]
mod tests {
    use crate::{Observable, OwnerToken};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_transform_propagates() {
        let source = Observable::new(2);
        let derived = source.transform(|x: &i32| x * 10);
        assert_eq!(derived.get(), 20);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let owner = OwnerToken::new();
        derived.subscribe(&owner, {
            let seen = seen.clone();
            move |value: &i32| seen.borrow_mut().push(*value)
        });

        source.set(3);
        assert_eq!(derived.get(), 30);
        assert_eq!(*seen.borrow(), [30]);
    }

    #[test]
    fn test_derived_suppresses_equal_results() {
        let source = Observable::new(4);
        let parity = source.transform(|x: &i32| x % 2 == 0);

        let count = Rc::new(RefCell::new(0));
        let owner = OwnerToken::new();
        parity.subscribe(&owner, {
            let count = count.clone();
            move |_: &bool| *count.borrow_mut() += 1
        });

        source.set(6);
        source.set(8);
        assert_eq!(*count.borrow(), 0);
        source.set(9);
        assert_eq!(*count.borrow(), 1);
        assert!(!parity.get());
    }

    #[test]
    fn test_dropped_derived_is_released() {
        let source = Observable::new(1);
        let derived = source.transform(|x: &i32| x + 1);
        assert_eq!(source.subscriber_count(), 1);

        drop(derived);
        assert_eq!(source.subscriber_count(), 0);
        source.set(2);
    }
}
