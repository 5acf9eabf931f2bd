//! Latest-value-wins cell.
//!
//! A [`Watch`] starts out empty, which is how "no sample received yet" is
//! represented throughout the telemetry cache. Every write replaces the whole
//! value under a blocking mutex, so a reader never observes a partial update.

use maitake_sync::blocking::DefaultMutex;
use mutex::{BlockingMutex, ConstInit, ScopedRawMutex};

pub struct Watch<T, M: ScopedRawMutex = DefaultMutex> {
    value: BlockingMutex<M, Option<T>>,
}

impl<T: Clone, M: ScopedRawMutex + ConstInit> Default for Watch<T, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, M: ScopedRawMutex> Watch<T, M> {
    pub const fn new() -> Self
    where
        M: ConstInit,
    {
        Self {
            value: BlockingMutex::new(None),
        }
    }

    /// Copy of the current value, `None` if nothing was ever sent.
    pub fn try_get(&self) -> Option<T> {
        self.value.with_lock(|value| value.clone())
    }

    pub fn is(&self, other: &T) -> bool
    where
        T: PartialEq,
    {
        self.value
            .with_lock(|value| value.as_ref().is_some_and(|inner| inner == other))
    }

    /// Replace the current value.
    pub fn send(&self, value: T) {
        self.value.with_lock(|current| *current = Some(value));
    }

    /// Modify the current value in place, starting from `init` if empty.
    /// The read-modify-write happens under a single lock.
    pub fn modify_or(&self, init: T, func: impl FnOnce(&mut T)) {
        self.value.with_lock(|value| func(value.get_or_insert(init)));
    }
}
