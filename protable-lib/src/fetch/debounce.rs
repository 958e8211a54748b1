//! Single-slot debounce queue.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

/// Timer-owning queue with one pending slot.
///
/// Each [`trigger`](Debouncer::trigger) replaces the pending payload and
/// restarts the wait; the payload is released by [`fired`](Debouncer::fired)
/// once the wait elapses without another trigger. Cheap to clone; clones share
/// the slot.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use protable_lib::fetch::Debouncer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let debouncer = Debouncer::new(Duration::from_millis(10));
/// debouncer.trigger(1);
/// debouncer.trigger(2);
/// assert_eq!(debouncer.fired().await, Some(2));
/// # }
/// ```
pub struct Debouncer<T> {
    inner: Arc<DebouncerInner<T>>,
}

struct DebouncerInner<T> {
    slot: Mutex<Slot<T>>,
    notify: Notify,
    wait: Duration,
}

struct Slot<T> {
    pending: Option<T>,
    deadline: Option<Instant>,
    closed: bool,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debouncer<T> {
    /// Creates a debouncer with the given wait window.
    pub fn new(wait: Duration) -> Self {
        Self {
            inner: Arc::new(DebouncerInner {
                slot: Mutex::new(Slot {
                    pending: None,
                    deadline: None,
                    closed: false,
                }),
                notify: Notify::new(),
                wait,
            }),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedules `payload`, replacing any pending one and restarting the wait.
    ///
    /// Ignored once the debouncer is closed.
    pub fn trigger(&self, payload: T) {
        {
            let mut slot = self.slot();
            if slot.closed {
                return;
            }
            if slot.pending.is_some() {
                log::trace!("Debounce trigger replaced a pending payload");
            }
            slot.pending = Some(payload);
            slot.deadline = Some(Instant::now() + self.inner.wait);
        }
        self.inner.notify.notify_one();
    }

    /// Drops the pending payload, if any.
    pub fn cancel(&self) {
        {
            let mut slot = self.slot();
            slot.pending = None;
            slot.deadline = None;
        }
        self.inner.notify.notify_one();
    }

    /// Cancels and stops accepting triggers; [`fired`](Debouncer::fired)
    /// returns `None` from now on.
    pub fn close(&self) {
        {
            let mut slot = self.slot();
            slot.closed = true;
            slot.pending = None;
            slot.deadline = None;
        }
        self.inner.notify.notify_one();
    }

    /// Returns `true` while a payload waits for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.slot().pending.is_some()
    }

    /// The configured wait window.
    pub fn wait(&self) -> Duration {
        self.inner.wait
    }

    /// Waits for the next payload whose window elapsed.
    ///
    /// Returns `None` once the debouncer is closed.
    pub async fn fired(&self) -> Option<T> {
        loop {
            let deadline = {
                let slot = self.slot();
                if slot.closed {
                    return None;
                }
                slot.deadline
            };

            match deadline {
                None => self.inner.notify.notified().await,
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {
                            let mut slot = self.slot();
                            // A trigger may have pushed the deadline while we slept.
                            if slot.deadline.is_some_and(|d| d <= Instant::now()) {
                                slot.deadline = None;
                                if let Some(payload) = slot.pending.take() {
                                    return Some(payload);
                                }
                            }
                        }
                        _ = self.inner.notify.notified() => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let started = Instant::now();
        debouncer.trigger("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.trigger("b");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.trigger("c");

        assert_eq!(debouncer.fired().await, Some("c"));
        assert!(started.elapsed() >= Duration::from_millis(400));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_then_trigger() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.trigger(1);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        debouncer.trigger(2);
        assert_eq!(debouncer.fired().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_wakes_waiter() {
        let debouncer: Debouncer<u8> = Debouncer::new(Duration::from_millis(50));
        let waiter = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.fired().await })
        };
        tokio::task::yield_now().await;
        debouncer.close();
        assert_eq!(waiter.await.unwrap(), None);
        debouncer.trigger(1);
        assert!(!debouncer.is_pending());
    }
}
