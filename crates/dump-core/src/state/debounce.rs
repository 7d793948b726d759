//! Trailing-edge debounce driven by a generation counter.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs only the most recently scheduled action, once `delay` has passed
/// without a newer one.
///
/// A superseded timer still wakes up, sees a newer generation, and exits
/// without running its action. Work already started is never aborted.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `action`, superseding anything still waiting.
    ///
    /// The handle resolves to `true` when the action ran.
    pub fn schedule<F>(&self, action: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                return false;
            }
            action.await;
            true
        })
    }

    /// Drops whatever is waiting.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
