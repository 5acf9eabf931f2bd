use core::future::Future;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use maitake_sync::{blocking::DefaultMutex, WaitQueue};
use mutex::{ConstInit, ScopedRawMutex};

/// Latched shutdown signal from the host process.
///
/// Once [`Shutdown::trigger`] has been called, every current and future
/// [`Shutdown::wait`] completes immediately, so a task that only starts
/// listening after the fact still terminates.
pub struct Shutdown<M: ScopedRawMutex = DefaultMutex> {
    triggered: AtomicBool,
    queue: WaitQueue<M>,
}

impl<M: ScopedRawMutex + ConstInit> Default for Shutdown<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ScopedRawMutex> Shutdown<M> {
    pub const fn new() -> Self
    where
        M: ConstInit,
    {
        Self {
            triggered: AtomicBool::new(false),
            queue: WaitQueue::new_with_raw_mutex(M::INIT),
        }
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Release);
        self.queue.close();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }

    /// Completes once the shutdown has been triggered.
    pub async fn wait(&self) {
        // A closed queue makes the wait fail, which is exactly the signal
        while self.queue.wait().await.is_ok() {}
    }

    /// Run the provided future until completion, or until shutdown is
    /// triggered. If the future completes first, its value is returned.
    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        if self.is_triggered() {
            return None;
        }

        match select(future, self.wait()).await {
            Either::First(value) => Some(value),
            Either::Second(()) => None,
        }
    }
}
