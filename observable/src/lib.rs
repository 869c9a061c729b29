/*!
Observable values with weak-owner keyed bindings for ankurah

# Design requirements:
- An observable holds a value and notifies synchronously, in registration order, when it is assigned
- Every binding is keyed by an owner which the observable never keeps alive
- A second binding for the same owner joins that owner's existing bundle
- Unsubscribing is by owner, not by handle: `unsubscribe(owner)` drops everything the owner registered
- Suppression is a plain `(old, new) -> bool` predicate fixed at construction. `Observable::new` uses `==`
- Single-threaded: everything is `Rc`/`RefCell` based and `!Send`

# Nomenclature:
- owner - anything implementing [`Owner`]: an `Rc<_>`, an [`OwnerToken`], or another [`Observable`]
- bundle - the callbacks of one owner, kept in three lists (old value, new value, old and new value)
- sweep - dropping the entries of owners that no longer exist. Happens on register, unregister and notify

# Basic usage

```rust
use ankurah_observable::*;
use std::{cell::RefCell, rc::Rc};

let count = Observable::new(1);
let owner = OwnerToken::new();
let seen = Rc::new(RefCell::new(Vec::new()));

count.subscribe(&owner, {
    let seen = seen.clone();
    move |value: &i32| seen.borrow_mut().push(*value)
});

count.set(1); // equal to the current value, suppressed
count.set(2);
assert!(count.unsubscribe(&owner));
count.set(3);

assert_eq!(*seen.borrow(), [2]);
```

# Derived observables

```rust
use ankurah_observable::*;

let celsius = Observable::new(20.0);
let fahrenheit = celsius.transform(|c: &f64| c * 9.0 / 5.0 + 32.0);
assert_eq!(fahrenheit.get(), 68.0);

celsius.set(100.0);
assert_eq!(fahrenheit.get(), 212.0);
```

# Attaching an owner

```rust
use ankurah_observable::*;
use std::{cell::Cell, rc::Rc};

struct Gauge {
    level: Cell<u8>,
}

let level = Observable::new(0u8);
let gauge = Rc::new(Gauge { level: Cell::new(0) });
gauge.attach(&level, |gauge: &Gauge, value: &u8| gauge.level.set(*value));

level.set(7);
assert_eq!(gauge.level.get(), 7);

// the binding goes inert with its owner
drop(gauge);
level.set(8);
assert_eq!(level.subscriber_count(), 0);
```
*/

mod attach;
mod binding;
mod error;
mod observable;
mod owner;
pub mod porcelain;
mod registry;
mod transform;

pub use attach::*;
pub use binding::*;
pub use error::*;
pub use observable::*;
pub use owner::*;
pub use registry::*;

#[cfg(feature = "tokio")]
pub use porcelain::{Wait, WaitResult};
