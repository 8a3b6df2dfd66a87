//! File watching for the kit store.

use cmkits_types::{KitError, Result};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events closer together than this are reported once.
const DEBOUNCE: Duration = Duration::from_millis(50);

/// Reports changes to a single file.
///
/// The parent directory is watched rather than the file itself, so the file
/// may be created, replaced, or deleted without losing the watch.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<EventKind>,
}

impl StoreWatcher {
    /// Start watching `path`. Its parent directory is created if needed.
    pub fn new(path: &Path) -> Result<Self> {
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| KitError::Watch(format!("{:?} has no file name", path)))?
            .to_owned();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        std::fs::create_dir_all(&dir)?;

        let (tx, events) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    let relevant = matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) && event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if relevant {
                        let _ = tx.send(event.kind);
                    }
                }
                Err(e) => warn!("Kit store watch error: {}", e),
            },
            NotifyConfig::default(),
        )
        .map_err(|e| KitError::Watch(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| KitError::Watch(e.to_string()))?;
        debug!("Watching {:?} for changes", path);

        Ok(Self {
            _watcher: watcher,
            events,
        })
    }

    /// Wait for the next change. Returns `false` if the watcher has stopped.
    pub async fn changed(&mut self) -> bool {
        let Some(kind) = self.events.recv().await else {
            return false;
        };
        debug!("Kit store changed ({:?})", kind);

        // A single save shows up as several events
        tokio::time::sleep(DEBOUNCE).await;
        self.drain();
        true
    }

    /// Whether a change has been observed since the last call, without
    /// waiting.
    pub fn take_pending(&mut self) -> bool {
        self.drain() > 0
    }

    fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.events.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}
