// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::engine::debounce::Debouncer;
use crate::engine::ExitReason;
use crate::pipeline::StageIndex;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Stop the child, then run the pipeline from this stage.
    RunPipeline(StageIndex),
    /// Stop the child (shutdown path).
    StopChild,
    /// Leave the loop.
    RequestExit(ExitReason),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn exit(reason: ExitReason) -> Self {
        Self {
            commands: vec![CoreCommand::StopChild, CoreCommand::RequestExit(reason)],
            keep_running: false,
        }
    }
}

/// Handle a classified action: feed it to the debouncer.
pub fn handle_stage_trigger(
    debouncer: &mut Debouncer,
    pipeline_len: usize,
    stage: StageIndex,
    path: PathBuf,
    now: Instant,
) -> CoreStep {
    if stage >= pipeline_len {
        warn!(stage, ?path, "action for unknown stage; ignoring");
        return CoreStep::idle();
    }

    if debouncer.record(stage, now) {
        debug!(stage, ?path, "change recorded; debounce deadline reset");
    }

    CoreStep::idle()
}

/// Handle a debounce timer expiry.
pub fn handle_deadline(debouncer: &mut Debouncer, generation: u64) -> CoreStep {
    match debouncer.fire(generation) {
        Some(stage) => {
            info!(stage, "change settled; running pipeline");
            CoreStep {
                commands: vec![CoreCommand::RunPipeline(stage)],
                keep_running: true,
            }
        }
        None => CoreStep::idle(),
    }
}

pub fn handle_watch_failure(message: String) -> CoreStep {
    error!(error = %message, "file watcher failed; shutting down");
    CoreStep::exit(ExitReason::WatchFailed(message))
}

pub fn handle_source_closed() -> CoreStep {
    info!("watch event channel closed; shutting down");
    CoreStep::exit(ExitReason::SourceClosed)
}

pub fn handle_shutdown() -> CoreStep {
    info!("interrupt received; stopping child and exiting");
    CoreStep::exit(ExitReason::Interrupted)
}
