// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! The core consumes [`RuntimeEvent`]s and produces [`CoreCommand`]s for the
//! IO shell (`engine::runtime::Runtime`), which is responsible for:
//! - reading events and interrupts from channels
//! - arming the debounce timer
//! - running the pipeline through an `ExecutorBackend`
//!
//! The core has no channels, spawns nothing and performs no IO, so it can be
//! unit tested with plain `Instant`s.
//!
//! [`CoreCommand`]: crate::engine::CoreCommand

use tokio::time::Instant;

use crate::engine::debounce::Debouncer;
use crate::engine::event_handlers::{
    CoreStep, handle_deadline, handle_shutdown, handle_source_closed, handle_stage_trigger,
    handle_watch_failure,
};
use crate::engine::RuntimeEvent;
use crate::pipeline::Pipeline;

#[derive(Debug)]
pub struct CoreRuntime {
    pipeline: Pipeline,
    debouncer: Debouncer,
}

impl CoreRuntime {
    pub fn new(pipeline: Pipeline, debouncer: Debouncer) -> Self {
        Self {
            pipeline,
            debouncer,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Deadline and generation for the shell's timer.
    pub fn armed(&self) -> Option<(Instant, u64)> {
        self.debouncer.armed()
    }

    /// Handle a single runtime event observed at `now`.
    pub fn step(&mut self, event: RuntimeEvent, now: Instant) -> CoreStep {
        match event {
            RuntimeEvent::StageTriggered { stage, path } => {
                handle_stage_trigger(&mut self.debouncer, self.pipeline.len(), stage, path, now)
            }
            RuntimeEvent::DeadlineElapsed { generation } => {
                handle_deadline(&mut self.debouncer, generation)
            }
            RuntimeEvent::WatchFailed { message } => handle_watch_failure(message),
            RuntimeEvent::SourceClosed => handle_source_closed(),
            RuntimeEvent::ShutdownRequested => handle_shutdown(),
        }
    }
}
