use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};
use vigil_core::MetricsSnapshot;

use crate::MetricSource;

/// Handle to a running monitor task.
///
/// [`stop`](Self::stop) may be called any number of times; dropping the
/// handle stops the task as well, so no ticker outlives it.
pub struct MonitorHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Ask the task to exit at its next wake-up. Idempotent.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
            debug!("monitor stop requested");
        }
    }

    /// Stop and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn a background Tokio task that polls `source` every `interval` and
/// forwards [`MetricsSnapshot`]s through the returned channel.
///
/// A failed sample is logged and skipped. The task stops when the handle is
/// stopped or dropped, or when the receiver is dropped.
pub fn spawn_monitor<S: MetricSource>(
    mut source: S,
    interval: Duration,
) -> (MonitorHandle, mpsc::Receiver<MetricsSnapshot>) {
    let (tx, rx) = mpsc::channel(4);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(source = source.id(), ?interval, "metric monitor started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {}
            }

            let now_ms = chrono::Utc::now().timestamp_millis();
            match source.sample(now_ms) {
                Ok(snapshot) => tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    sent = tx.send(snapshot) => {
                        if sent.is_err() {
                            break; // all receivers dropped
                        }
                    }
                },
                Err(e) => warn!(source = source.id(), "sample failed: {e}"),
            }
        }

        info!(source = source.id(), "metric monitor stopped");
    });

    let handle = MonitorHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    };
    (handle, rx)
}
