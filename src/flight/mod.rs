//! Call Deduplication (single-flight)
//!
//! Collapses overlapping loads of the same key into one execution. The first caller for a
//! key becomes the executor; callers arriving while it runs wait for its result instead of
//! starting their own. The in-flight marker is removed as soon as the call finishes, so a
//! later, non-overlapping call executes again.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::watch;

pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, watch::Receiver<Option<T>>>>,
}

enum Role<T> {
    Executor(watch::Sender<Option<T>>),
    Waiter(watch::Receiver<Option<T>>),
}

/// Removes the in-flight marker when the executor finishes or is dropped mid-call.
struct InFlight<'a, T> {
    group: &'a FlightGroup<T>,
    key: &'a str,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.group.calls.lock().remove(self.key);
    }
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` for `key` unless a call for `key` is already in flight, in which case
    /// its result is shared instead.
    ///
    /// If the executing call is cancelled before producing a value, one of the waiters
    /// takes over and runs its own `f`.
    pub async fn run<F, Fut>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let tx = loop {
            match self.join(key) {
                Role::Executor(tx) => break tx,
                Role::Waiter(mut rx) => {
                    if let Ok(shared) = rx.wait_for(Option::is_some).await
                        && let Some(value) = shared.as_ref()
                    {
                        return value.clone();
                    }
                    tracing::debug!("In-flight call for {} abandoned, retrying", key);
                }
            }
        };

        let _in_flight = InFlight { group: self, key };
        let value = f().await;
        tx.send_replace(Some(value.clone()));
        value
    }

    /// Number of calls currently executing.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    fn join(&self, key: &str) -> Role<T> {
        let mut calls = self.calls.lock();
        if let Some(rx) = calls.get(key) {
            return Role::Waiter(rx.clone());
        }
        let (tx, rx) = watch::channel(None);
        calls.insert(key.to_string(), rx);
        Role::Executor(tx)
    }
}

impl<T> Default for FlightGroup<T>
where
    T: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
