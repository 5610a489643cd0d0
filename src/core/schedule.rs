//! Scheduled tasks with cancellation handles.
//!
//! The reveal ticker, the submit delay, and the copy-indicator revert are all
//! spawned timer tasks that feed events back to the chat loop over its
//! channel. Each returns a [`TaskHandle`] so teardown and transcript clears
//! can cancel outstanding timers instead of leaking them.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Send `event` once after `delay`, unless cancelled first.
pub fn once<E: Send + 'static>(
    tx: UnboundedSender<E>,
    delay: Duration,
    event: E,
) -> TaskHandle {
    let token = CancellationToken::new();
    let task_token = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = task_token.cancelled() => {}
            _ = tokio::time::sleep(delay) => {
                let _ = tx.send(event);
            }
        }
    });
    TaskHandle { token }
}

/// Send an event every `period` until cancelled. The first event fires one
/// full period after scheduling, matching a plain interval timer.
pub fn repeating<E, F>(tx: UnboundedSender<E>, period: Duration, make_event: F) -> TaskHandle
where
    E: Send + 'static,
    F: Fn() -> E + Send + 'static,
{
    let token = CancellationToken::new();
    let task_token = token.clone();
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        loop {
            tokio::select! {
                _ = task_token.cancelled() => break,
                _ = interval.tick() => {
                    if tx.send(make_event()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    TaskHandle { token }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn once_delivers_after_the_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        once(tx, Duration::from_millis(5), "fired");
        assert_eq!(rx.recv().await, Some("fired"));
    }

    #[tokio::test]
    async fn cancelled_task_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = once(tx, Duration::from_millis(20), "fired");
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn repeating_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = repeating(tx, Duration::from_millis(5), || "tick");
        assert_eq!(rx.recv().await, Some("tick"));
        assert_eq!(rx.recv().await, Some("tick"));
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
