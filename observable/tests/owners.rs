mod common;
use ankurah_observable::*;
use common::{init_tracing, watcher};
use std::{cell::RefCell, rc::Rc};

struct Widget {
    name: String,
}

#[test]
fn test_dropped_owner_is_not_notified() {
    init_tracing();
    let observable = Observable::new(0);
    let owner = Rc::new(Widget { name: "w".into() });
    let weak = Rc::downgrade(&owner);
    let (accumulate, check) = watcher::<i32>();

    observable.subscribe(&owner, accumulate);
    observable.set(1);
    assert_eq!(check(), [1]);

    drop(owner);
    // the registry never held the owner
    assert!(weak.upgrade().is_none());

    observable.set(2);
    assert_eq!(check(), [] as [i32; 0]);
    assert_eq!(observable.subscriber_count(), 0);
}

#[test]
fn test_identity_not_equality() {
    let observable = Observable::new(0);
    let first = Rc::new(Widget { name: "twin".into() });
    let second = Rc::new(Widget { name: "twin".into() });
    assert_eq!(first.name, second.name);

    observable.subscribe(&first, |_: &i32| {}).subscribe(&second, |_: &i32| {});
    assert_eq!(observable.subscriber_count(), 2);

    assert!(observable.unsubscribe(&first));
    assert!(!observable.is_subscribed(&first));
    assert!(observable.is_subscribed(&second));
}

#[test]
fn test_owner_dropped_mid_notification() {
    let observable = Observable::new(0);
    let first = OwnerToken::new();
    let second = Rc::new(RefCell::new(Some(OwnerToken::new())));
    let (accumulate, check) = watcher::<i32>();

    // the first owner's callback drops the second owner before it is reached
    observable.subscribe(&first, {
        let second = second.clone();
        move |_: &i32| {
            second.borrow_mut().take();
        }
    });
    {
        let token = second.borrow();
        observable.subscribe(token.as_ref().unwrap(), accumulate);
    }

    observable.set(1);
    assert_eq!(check(), [] as [i32; 0]);
    assert_eq!(observable.subscriber_count(), 1);
}

#[test]
fn test_observable_dropped_without_notifying() {
    let owner = OwnerToken::new();
    let (accumulate, check) = watcher::<i32>();
    {
        let observable = Observable::new(0);
        observable.subscribe(&owner, accumulate);
    }
    assert_eq!(check(), [] as [i32; 0]);
}

#[test]
fn test_failing_subscriber_aborts_later_owners() {
    let observable = Observable::new(0);
    let a = OwnerToken::new();
    let b = OwnerToken::new();
    let c = OwnerToken::new();
    let (accumulate_a, check_a) = watcher::<i32>();
    let (accumulate_c, check_c) = watcher::<i32>();

    observable
        .subscribe(&a, accumulate_a)
        .try_subscribe(&b, |value: &i32| if *value > 5 { Err(anyhow::anyhow!("too large: {value}")) } else { Ok(()) })
        .subscribe(&c, accumulate_c);

    observable.try_set(3).unwrap();
    assert_eq!(check_a(), [3]);
    assert_eq!(check_c(), [3]);

    let err = observable.try_set(6).unwrap_err();
    assert!(matches!(err, NotifyError::Callback { category: Category::New, .. }));
    assert_eq!(check_a(), [6]);
    assert_eq!(check_c(), [] as [i32; 0]);
}

#[test]
fn test_unsubscribe_from_callback() {
    let observable = Observable::new(0);
    let owner = OwnerToken::new();
    let (accumulate, check) = watcher::<i32>();

    observable.subscribe(&owner, accumulate);
    observable.subscribe(&owner, {
        let weak = observable.downgrade();
        let owner = owner.clone();
        move |_: &i32| {
            if let Some(observable) = weak.upgrade() {
                observable.unsubscribe(&owner);
            }
        }
    });

    observable.set(1);
    observable.set(2);
    assert_eq!(check(), [1]);
}
