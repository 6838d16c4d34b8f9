// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::errors::{DevloopError, Result};
use crate::pipeline::Pipeline;
use crate::watch::event_handler::process_watch_result;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching, which in turn closes the runtime's event channel.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    paths: Vec<PathBuf>,
}

impl WatcherHandle {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

/// Watch `paths` and send a `RuntimeEvent::StageTriggered` for every
/// content change that classifies to a pipeline stage.
///
/// Registration failures are returned as `DevloopError::WatchPath`.
/// Errors reported later by notify are forwarded as
/// `RuntimeEvent::WatchFailed`, after which forwarding stops.
pub fn spawn_watcher(
    paths: Vec<PathBuf>,
    recursive: bool,
    pipeline: Pipeline,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send(res) {
                // We can't log via tracing here easily, so fallback to stderr.
                eprintln!("devloop: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    for path in &paths {
        watcher
            .watch(path, mode)
            .map_err(|source| DevloopError::WatchPath {
                path: path.clone(),
                source,
            })?;
        debug!(?path, "watching");
    }

    info!(count = paths.len(), recursive, "file watcher started");

    tokio::spawn(async move {
        while let Some(result) = event_rx.recv().await {
            if !process_watch_result(&pipeline, result, &runtime_tx).await {
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        paths,
    })
}
