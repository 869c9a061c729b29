use std::rc::Rc;

/// Callback that receives a single value (the old or the new one, depending on its category)
pub type ValueCallback<T> = Rc<dyn Fn(&T) -> anyhow::Result<()> + 'static>;

/// Callback that receives the previous and the current value
pub type ChangeCallback<T> = Rc<dyn Fn(&T, &T) -> anyhow::Result<()> + 'static>;

/// The three callback lists a bundle keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Old,
    New,
    OldAndNew,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Old => write!(f, "old value"),
            Category::New => write!(f, "new value"),
            Category::OldAndNew => write!(f, "old and new value"),
        }
    }
}

/// A value change as delivered to a registry
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    OldValue(T),
    NewValue(T),
    OldAndNew(T, T),
}

/// A callback together with the category it is registered under
pub enum Binding<T> {
    Old(ValueCallback<T>),
    New(ValueCallback<T>),
    OldAndNew(ChangeCallback<T>),
}

impl<T> Binding<T> {
    pub fn category(&self) -> Category {
        match self {
            Binding::Old(_) => Category::Old,
            Binding::New(_) => Category::New,
            Binding::OldAndNew(_) => Category::OldAndNew,
        }
    }
}

impl<T: 'static> Binding<T> {
    /// Infallible new-value binding
    pub fn on_new<F>(f: F) -> Self
    where F: Fn(&T) + 'static {
        Binding::New(Rc::new(move |value: &T| -> anyhow::Result<()> {
            f(value);
            Ok(())
        }))
    }

    /// Infallible old-value binding
    pub fn on_old<F>(f: F) -> Self
    where F: Fn(&T) + 'static {
        Binding::Old(Rc::new(move |value: &T| -> anyhow::Result<()> {
            f(value);
            Ok(())
        }))
    }

    /// Infallible combined binding
    pub fn on_change<F>(f: F) -> Self
    where F: Fn(&T, &T) + 'static {
        Binding::OldAndNew(Rc::new(move |old: &T, new: &T| -> anyhow::Result<()> {
            f(old, new);
            Ok(())
        }))
    }
}

/// Per-owner callbacks, partitioned by category. Each list is kept in registration order.
pub struct BindingBundle<T> {
    pub(crate) on_old: Vec<ValueCallback<T>>,
    pub(crate) on_new: Vec<ValueCallback<T>>,
    pub(crate) on_old_and_new: Vec<ChangeCallback<T>>,
}

impl<T> Default for BindingBundle<T> {
    fn default() -> Self { Self { on_old: Vec::new(), on_new: Vec::new(), on_old_and_new: Vec::new() } }
}

// Clones share the callbacks, not copies of them
impl<T> Clone for BindingBundle<T> {
    fn clone(&self) -> Self { Self { on_old: self.on_old.clone(), on_new: self.on_new.clone(), on_old_and_new: self.on_old_and_new.clone() } }
}

impl<T> BindingBundle<T> {
    pub fn push(&mut self, binding: Binding<T>) {
        match binding {
            Binding::Old(callback) => self.on_old.push(callback),
            Binding::New(callback) => self.on_new.push(callback),
            Binding::OldAndNew(callback) => self.on_old_and_new.push(callback),
        }
    }

    /// Number of callbacks in the given category
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Old => self.on_old.len(),
            Category::New => self.on_new.len(),
            Category::OldAndNew => self.on_old_and_new.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.on_old.is_empty() && self.on_new.is_empty() && self.on_old_and_new.is_empty() }

    /// Run the callbacks this change addresses. For the combined change: old-value callbacks,
    /// then new-value callbacks, then combined callbacks. Stops at the first failure.
    pub(crate) fn fire(&self, change: &Change<T>) -> Result<(), crate::NotifyError> {
        match change {
            Change::OldValue(old) => run(&self.on_old, old, Category::Old),
            Change::NewValue(new) => run(&self.on_new, new, Category::New),
            Change::OldAndNew(old, new) => {
                run(&self.on_old, old, Category::Old)?;
                run(&self.on_new, new, Category::New)?;
                for callback in &self.on_old_and_new {
                    callback(old, new).map_err(|source| crate::NotifyError::Callback { category: Category::OldAndNew, source })?;
                }
                Ok(())
            }
        }
    }
}

fn run<T>(callbacks: &[ValueCallback<T>], value: &T, category: Category) -> Result<(), crate::NotifyError> {
    for callback in callbacks {
        callback(value).map_err(|source| crate::NotifyError::Callback { category, source })?;
    }
    Ok(())
}

/// Trait for types that can be converted into new-value callbacks
pub trait IntoValueCallback<T> {
    fn into_value_callback(self) -> ValueCallback<T>;
}

// Closures
impl<F, T> IntoValueCallback<T> for F
where
    F: Fn(&T) + 'static,
    T: 'static,
{
    fn into_value_callback(self) -> ValueCallback<T> {
        Rc::new(move |value: &T| -> anyhow::Result<()> {
            self(value);
            Ok(())
        })
    }
}

// A disconnected receiver is not a failure of the notification
impl<T: Clone + 'static> IntoValueCallback<T> for std::sync::mpsc::Sender<T> {
    fn into_value_callback(self) -> ValueCallback<T> {
        Rc::new(move |value: &T| -> anyhow::Result<()> {
            let _ = self.send(value.clone());
            Ok(())
        })
    }
}

#[cfg(feature = "tokio")]
impl<T: Clone + 'static> IntoValueCallback<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn into_value_callback(self) -> ValueCallback<T> {
        Rc::new(move |value: &T| -> anyhow::Result<()> {
            let _ = self.send(value.clone());
            Ok(())
        })
    }
}
