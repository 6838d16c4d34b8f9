// src/engine/mod.rs

//! Orchestration engine for devloop.
//!
//! This module ties together:
//! - the debounce coordinator (which stage should run, and when)
//! - the main runtime event loop that reacts to:
//!   - classified file-change actions
//!   - debounce deadline expiry
//!   - watch-source failures
//!   - interrupt signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use crate::pipeline::StageIndex;

/// Outcome of a single build command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failed(i32),
}

/// Runtime options used by the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Run the pipeline from stage 0 at startup instead of only starting
    /// the child.
    pub build_on_start: bool,
}

/// Events flowing into the core runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A changed path was classified to a pipeline stage.
    StageTriggered { stage: StageIndex, path: PathBuf },
    /// The debounce timer armed with `generation` elapsed.
    DeadlineElapsed { generation: u64 },
    /// The filesystem event source reported an error.
    WatchFailed { message: String },
    /// Every event sender was dropped.
    SourceClosed,
    /// Interrupt (Ctrl-C).
    ShutdownRequested,
}

/// Why the runtime loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    Interrupted,
    SourceClosed,
    WatchFailed(String),
}

pub mod core;
pub mod debounce;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use debounce::{Debouncer, PendingAction};
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
