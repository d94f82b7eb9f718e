use std::sync::atomic::{AtomicI64, Ordering};

/// Integer accumulator shared between worker tasks.
///
/// Every operation is a single atomic read-modify-write, so concurrent
/// increments never lose updates.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicI64,
}

impl AtomicCounter {
    pub fn new(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }

    /// Adds `delta` and returns the new value.
    pub fn increment(&self, delta: i64) -> i64 {
        self.value.fetch_add(delta, Ordering::SeqCst) + delta
    }

    /// Subtracts `delta` and returns the new value.
    pub fn decrement(&self, delta: i64) -> i64 {
        self.increment(-delta)
    }

    pub fn inc(&self) -> i64 {
        self.increment(1)
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::SeqCst);
    }
}
