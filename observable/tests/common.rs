use std::{cell::RefCell, rc::Rc};

/// Returns a callback that records every value it is given, and a closure that drains the record
#[allow(unused)]
pub fn watcher<T: Clone + 'static>() -> (impl Fn(&T) + Clone + 'static, impl Fn() -> Vec<T>) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let accumulate = {
        let changes = changes.clone();
        move |value: &T| changes.borrow_mut().push(value.clone())
    };

    let check = move || changes.borrow_mut().drain(..).collect::<Vec<T>>();

    (accumulate, check)
}

#[allow(unused)]
pub fn init_tracing() { let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init(); }
