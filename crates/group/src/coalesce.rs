//! Request coalescing for concurrent loads of the same key
//!
//! The first caller for a key runs the load; callers arriving while it is in
//! flight block and receive a clone of its result. Once the load finishes the
//! record is dropped, so the next call loads again. Nothing is memoized here.

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

enum CallState<T> {
    Pending,
    Complete(T),
    /// The load panicked before producing a value
    Abandoned,
}

/// One in-flight load and the callers waiting on it
struct Call<T> {
    state: Mutex<CallState<T>>,
    done: Condvar,
}

impl<T: Clone> Call<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(CallState::Pending),
            done: Condvar::new(),
        }
    }

    fn wait(&self, key: &str) -> T {
        let mut state = self.state.lock();
        loop {
            match &*state {
                CallState::Pending => self.done.wait(&mut state),
                CallState::Complete(value) => return value.clone(),
                CallState::Abandoned => {
                    panic!("coalesced load for key '{key}' panicked before completing")
                }
            }
        }
    }

    fn finish(&self, state: CallState<T>) {
        *self.state.lock() = state;
        self.done.notify_all();
    }
}

/// Collapses concurrent calls for the same key into a single execution.
pub struct CallCoalescer<T> {
    calls: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T: Clone> CallCoalescer<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Run `load` for `key` unless a load for `key` is already in flight, in
    /// which case block until it finishes and return its result.
    ///
    /// # Panics
    ///
    /// Waiters panic if the load they are waiting on panics.
    pub fn execute<F>(&self, key: &str, load: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut calls = self.calls.lock();
        if let Some(call) = calls.get(key) {
            let call = Arc::clone(call);
            drop(calls);
            tracing::trace!(key, "joining in-flight load");
            return call.wait(key);
        }

        let call = Arc::new(Call::new());
        calls.insert(key.to_string(), Arc::clone(&call));
        drop(calls);

        let mut guard = InFlight {
            coalescer: self,
            key,
            call: &call,
            finished: false,
        };
        let value = load();
        guard.complete(value.clone());
        value
    }

    /// Detach the in-flight record for `key`, if any.
    ///
    /// Callers already waiting still receive the running load's result; the
    /// next call for `key` starts a fresh load.
    pub fn forget(&self, key: &str) {
        self.calls.lock().remove(key);
    }

    /// Number of keys with a load in flight
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }

    fn release(&self, key: &str, call: &Arc<Call<T>>) {
        let mut calls = self.calls.lock();
        if calls.get(key).is_some_and(|current| Arc::ptr_eq(current, call)) {
            calls.remove(key);
        }
    }
}

impl<T: Clone> Default for CallCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallCoalescer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallCoalescer")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

/// Publishes the load's outcome, or marks the call abandoned if the load
/// unwinds, so waiters never block forever.
struct InFlight<'a, T: Clone> {
    coalescer: &'a CallCoalescer<T>,
    key: &'a str,
    call: &'a Arc<Call<T>>,
    finished: bool,
}

impl<T: Clone> InFlight<'_, T> {
    fn complete(&mut self, value: T) {
        self.finished = true;
        self.call.finish(CallState::Complete(value));
        self.coalescer.release(self.key, self.call);
    }
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(key = self.key, "load panicked, releasing waiters");
            self.call.finish(CallState::Abandoned);
            self.coalescer.release(self.key, self.call);
        }
    }
}
