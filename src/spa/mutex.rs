use tokio::sync::{Mutex, MutexGuard};

/// Single-slot lock that lets exactly one navigation resolve at a time.
///
/// Waiters are admitted in the order they called `acquire`.
#[derive(Debug, Default)]
pub struct NavigationMutex {
    slot: Mutex<()>,
}

/// Holds the navigation slot; released on drop, including unwinding and early returns.
#[derive(Debug)]
pub struct NavigationGuard<'a> {
    _slot: MutexGuard<'a, ()>,
}

impl NavigationMutex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> NavigationGuard<'_> {
        NavigationGuard {
            _slot: self.slot.lock().await,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.slot.try_lock().is_err()
    }
}
