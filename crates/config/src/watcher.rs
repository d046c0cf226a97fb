use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Watches a config file for changes and sends a notification on every write.
///
/// The watch task is aborted when the `ConfigWatcher` is dropped.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_watcher, mut rx) = vigil_config::ConfigWatcher::spawn("/home/user/.config/vigil/vigil.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed — reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let task = tokio::spawn(watch_loop(path.clone(), tx));

        (Self { path, task }, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", path.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                use notify::EventKind::*;
                if matches!(e.kind, Modify(_) | Create(_)) {
                    // A full channel already has a reload queued.
                    match tx.try_send(()) {
                        Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                        Err(mpsc::error::TrySendError::Closed(())) => break,
                    }
                } else {
                    debug!(kind = ?e.kind, "ignoring config event");
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn fires_on_write() {
        let dir = std::env::temp_dir().join(format!("vigil-watch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vigil.toml");
        std::fs::write(&path, "").unwrap();

        let (watcher, mut rx) = ConfigWatcher::spawn(&path);
        assert_eq!(watcher.path(), path.as_path());

        // Keep touching the file until the watcher is registered and reports.
        let fired = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                std::fs::write(&path, "[render]\nevery_ticks = 2\n").unwrap();
                if tokio::time::timeout(Duration::from_millis(200), rx.recv()).await.is_ok() {
                    break;
                }
            }
        })
        .await;
        assert!(fired.is_ok());
    }
}
