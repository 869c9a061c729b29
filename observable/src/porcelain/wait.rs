use crate::{Observable, OwnerToken};

/// Trait for waiting on observable values asynchronously
pub trait Wait<T: 'static> {
    /// Wait for the observable to hold a specific value
    fn wait_value(&self, target_value: T) -> impl std::future::Future<Output = ()>
    where T: PartialEq;

    /// Wait for the observable to reach a value matching the given predicate
    fn wait_for<F, R>(&self, predicate: F) -> impl std::future::Future<Output = R::Output>
    where
        F: Fn(&T) -> R + 'static,
        R: WaitResult;
}

/// Helper trait for `wait_for` to allow flexible predicate return types.
///
/// ## Semantics
/// - `result()` returns `Some(output)` to stop waiting and return `output`
/// - `result()` returns `None` to continue waiting for the next change
pub trait WaitResult {
    type Output;
    /// Returns Some(output) if we should stop waiting, None if we should continue
    fn result(self) -> Option<Self::Output>;
}

// true = stop with (), false = continue waiting
impl WaitResult for bool {
    type Output = ();
    fn result(self) -> Option<Self::Output> { if self { Some(()) } else { None } }
}

// Some(value) = stop with value, None = continue waiting
impl<T> WaitResult for Option<T> {
    type Output = T;
    fn result(self) -> Option<Self::Output> { self }
}

impl<T> Wait<T> for Observable<T>
where T: Clone + 'static
{
    fn wait_value(&self, target_value: T) -> impl std::future::Future<Output = ()>
    where T: PartialEq {
        self.wait_for(move |value: &T| *value == target_value)
    }

    fn wait_for<F, R>(&self, predicate: F) -> impl std::future::Future<Output = R::Output>
    where
        F: Fn(&T) -> R + 'static,
        R: WaitResult,
    {
        async move {
            if let Some(result) = self.with(|value| predicate(value).result()) {
                return result;
            }

            // Bridge the synchronous notifications to this task. The token is the owner of the
            // subscription, so dropping this future ends it.
            let token = OwnerToken::new();
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<T>();
            self.listen(&token, tx);

            while let Some(value) = rx.recv().await {
                if let Some(result) = predicate(&value).result() {
                    self.unsubscribe(&token);
                    return result;
                }
            }

            // The sender lives in our own registry entry, which outlives this loop
            unreachable!("subscription channel closed while the token was alive");
        }
    }
}
