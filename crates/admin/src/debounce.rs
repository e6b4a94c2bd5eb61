//! Settle-after-inactivity primitive for search input.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

enum Command<T> {
    Push(T),
    Cancel,
}

/// Coalesces rapid updates: only the last value pushed within `window`
/// settles, once, after `window` without further pushes.
///
/// Must be created inside a tokio runtime. Dropping the debouncer aborts its
/// task and discards any pending value.
pub struct Debouncer<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
    settled: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(window: Duration) -> Self {
        let (commands, mut rx) = mpsc::unbounded_channel::<Command<T>>();
        let (tx, settled) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                tokio::select! {
                    command = rx.recv() => match command {
                        Some(Command::Push(value)) => pending = Some(value),
                        Some(Command::Cancel) => pending = None,
                        None => break,
                    },
                    _ = sleep(window), if pending.is_some() => {
                        tx.send_replace(pending.take());
                    }
                }
            }
        });

        Self {
            commands,
            settled,
            task,
        }
    }

    /// Record a new value, restarting the inactivity window.
    pub fn push(&self, value: T) {
        if self.commands.send(Command::Push(value)).is_err() {
            debug!("Debouncer task is gone, value dropped");
        }
    }

    /// Drop the pending value, if any.
    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    /// Last settled value.
    pub fn current(&self) -> Option<T> {
        self.settled.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.settled.clone()
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
    use tokio::time::{advance, timeout};

    const WINDOW: Duration = Duration::from_millis(300);

    async fn tick(ms: u64) {
        tokio::task::yield_now().await;
        advance(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_settles_once() {
        let debouncer = Debouncer::new(WINDOW);
        let mut rx = debouncer.subscribe();

        for term in ["c", "ca", "caf", "cafe"] {
            debouncer.push(term.to_string());
            tick(100).await;
        }
        assert!(debouncer.current().is_none());

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("cafe"));

        // Nothing else settles afterwards.
        assert!(timeout(Duration::from_secs(5), rx.changed()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_value() {
        let debouncer = Debouncer::new(WINDOW);
        let mut rx = debouncer.subscribe();

        debouncer.push("pizza".to_string());
        tick(100).await;
        debouncer.cancel();

        assert!(timeout(Duration::from_secs(5), rx.changed()).await.is_err());
        assert!(debouncer.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_settling() {
        let debouncer = Debouncer::new(WINDOW);
        let mut rx = debouncer.subscribe();

        debouncer.push("sushi".to_string());
        drop(debouncer);

        // The sender side goes away with the task; no value ever settles.
        let outcome = timeout(Duration::from_secs(5), rx.changed()).await;
        assert!(matches!(outcome, Ok(Err(_))));
        assert!(rx.borrow().is_none());
    }
}
