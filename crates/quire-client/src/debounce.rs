//! Trailing-edge debouncer.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period before a typed search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs a callback with the latest pushed value once no new value has
/// arrived for `delay`. Each push restarts the timer. Dropping the debouncer
/// discards any pending value.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debouncing task; must be called inside a tokio runtime.
    pub fn new<F, Fut>(delay: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => break,
                            },
                            _ = tokio::time::sleep(delay) => callback(value).await,
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::warn!("Debouncer task has stopped; value dropped");
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, sleep};

    fn recording() -> (
        impl FnMut(&'static str) -> std::future::Ready<()> + Send + 'static,
        mpsc::UnboundedReceiver<&'static str>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let callback = move |value: &'static str| {
            let _ = tx.send(value);
            std::future::ready(())
        };
        (callback, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_with_last_value() {
        let (callback, mut fired) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);
        let start = Instant::now();

        debouncer.push("c");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ca");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("cat");

        assert_eq!(fired.recv().await, Some("cat"));
        assert!(start.elapsed() >= Duration::from_millis(700));

        sleep(Duration::from_secs(5)).await;
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (callback, mut fired) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);

        debouncer.push("first");
        sleep(Duration::from_millis(600)).await;
        debouncer.push("second");

        assert_eq!(fired.recv().await, Some("first"));
        assert_eq!(fired.recv().await, Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_value() {
        let (callback, mut fired) = recording();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, callback);

        debouncer.push("never");
        sleep(Duration::from_millis(100)).await;
        drop(debouncer);

        sleep(Duration::from_secs(1)).await;
        assert!(fired.try_recv().is_err());
    }
}
