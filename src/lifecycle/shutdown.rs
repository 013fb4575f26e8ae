//! Shutdown coordination.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Wraps a watch channel holding a single triggered flag. The signal task
/// (or a test) triggers it once, and every waiter observes it, including
/// waiters that start after the trigger fired. Cheap to clone; all clones
/// share the same channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Trigger the shutdown signal. Idempotent.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Wait until shutdown is triggered. Resolves immediately when the
    /// trigger already fired, so a signal delivered before any waiter polls
    /// is never lost.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // Err means the sender side is gone, which cannot happen while
        // `self` holds it.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_wakes_all_waiters() {
        let shutdown = Shutdown::new();
        let a = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.wait().await })
        };
        let b = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.wait().await })
        };
        tokio::task::yield_now().await;

        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), a)
            .await
            .expect("waiter a timed out")
            .expect("waiter a panicked");
        tokio::time::timeout(Duration::from_secs(1), b)
            .await
            .expect("waiter b timed out")
            .expect("waiter b panicked");
    }

    #[tokio::test]
    async fn wait_resolves_after_trigger() {
        let shutdown = Shutdown::new();
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.wait().await })
        };

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait timed out")
            .expect("wait task panicked");
    }

    #[tokio::test]
    async fn trigger_before_any_waiter_is_not_lost() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        // A waiter arriving after the fact still observes the trigger.
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .expect("late waiter never observed the trigger");
    }
}
