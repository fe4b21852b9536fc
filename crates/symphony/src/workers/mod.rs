//! Background polling loops.
//!
//! Every worker runs as a tokio task watching a shutdown channel; the
//! [`WorkerHandle`] returned when it is spawned stops it and waits for the
//! task to finish. A worker never exits on its own because of a failed call:
//! errors are logged and the call is retried after the configured delay.

mod connections;
mod feed;
mod presence;
mod room;

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use connections::ConnectionsWorker;
pub use feed::{FeedWorker, Recovery};
pub use presence::PresenceWorker;
pub use room::RoomWorker;

/// Owner of a running worker task.
#[derive(Debug)]
pub struct WorkerHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawn `run` with a fresh shutdown receiver.
    pub fn spawn<F, Fut>(name: &'static str, run: F) -> Self
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, rx) = watch::channel(false);
        tracing::info!(target = "symphony::workers", worker = name, "worker started");
        Self {
            name,
            shutdown,
            join: tokio::spawn(run(rx)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal shutdown and wait for the task. An in-flight request is
    /// abandoned rather than awaited.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(error) = self.join.await {
            tracing::warn!(
                target = "symphony::workers",
                worker = self.name,
                error = %error,
                "worker task ended abnormally"
            );
        }
        tracing::info!(target = "symphony::workers", worker = self.name, "worker stopped");
    }
}

/// Sleep for `duration`, returning `true` early if shutdown was requested.
pub(crate) async fn sleep_or_shutdown(
    duration: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    if *shutdown.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.changed() => true,
    }
}

pub(crate) fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Base delay plus up to 10% jitter so restarted bots do not retry in lockstep.
pub(crate) fn with_jitter(base: Duration) -> Duration {
    let max_jitter = (base.as_millis() as u64) / 10;
    if max_jitter == 0 {
        return base;
    }
    base + Duration::from_millis(rand::thread_rng().gen_range(0..=max_jitter))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn jitter_stays_within_ten_percent() {
        let base = Duration::from_millis(1_000);
        for _ in 0..100 {
            let delay = with_jitter(base);
            assert!(delay >= base);
            assert!(delay <= Duration::from_millis(1_100));
        }
        assert_eq!(with_jitter(Duration::from_millis(5)), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn sleep_returns_early_on_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        let sleeper =
            tokio::spawn(async move { sleep_or_shutdown(Duration::from_secs(60), &mut rx).await });
        tx.send(true).unwrap();
        let stopped = tokio::time::timeout(Duration::from_secs(5), sleeper)
            .await
            .unwrap()
            .unwrap();
        assert!(stopped);
    }

    #[tokio::test]
    async fn stop_waits_for_the_task() {
        let handle = WorkerHandle::spawn("test", |mut rx| async move {
            let _ = rx.changed().await;
        });
        assert_eq!(handle.name(), "test");
        tokio::time::timeout(Duration::from_secs(5), handle.stop())
            .await
            .unwrap();
    }
}
