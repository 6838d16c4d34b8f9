// src/watch/event_handler.rs

//! Turning raw `notify` events into classified runtime actions.

use std::path::PathBuf;

use notify::event::ModifyKind;
use notify::{Event, EventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::pipeline::{Pipeline, StageIndex, classify_path};

/// Whether an event kind means file content may have changed.
///
/// Writes and creations count (editors that save via rename show up as
/// creations); access, removal and metadata-only changes do not.
pub fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Classify an event to at most one stage.
///
/// When an event carries several paths, the most disruptive stage wins.
pub fn classify_event(pipeline: &Pipeline, event: &Event) -> Option<(StageIndex, PathBuf)> {
    if !is_content_change(&event.kind) {
        return None;
    }

    event
        .paths
        .iter()
        .filter_map(|path| classify_path(pipeline, path).map(|stage| (stage, path.clone())))
        .min_by_key(|(stage, _)| *stage)
}

/// Process one result from the notify callback.
///
/// Returns false when the watcher should stop forwarding: either the event
/// source failed (the failure has been forwarded) or the runtime is gone.
pub async fn process_watch_result(
    pipeline: &Pipeline,
    result: notify::Result<Event>,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    let event = match result {
        Ok(event) => event,
        Err(err) => {
            let _ = runtime_tx
                .send(RuntimeEvent::WatchFailed {
                    message: err.to_string(),
                })
                .await;
            return false;
        }
    };

    let Some((stage, path)) = classify_event(pipeline, &event) else {
        debug!(kind = ?event.kind, paths = ?event.paths, "no stage for event");
        return true;
    };

    debug!(stage, ?path, "classified change");

    if let Err(err) = runtime_tx
        .send(RuntimeEvent::StageTriggered { stage, path })
        .await
    {
        warn!("failed to send RuntimeEvent::StageTriggered: {err}");
        return false;
    }

    true
}
