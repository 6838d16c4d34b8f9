// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::errors::{DevloopError, Result};
use crate::exec::{ExecutorBackend, PipelineOutcome, run_pipeline};

use super::core::CoreRuntime;
use super::{CoreCommand, ExitReason, RuntimeEvent, RuntimeOptions};

/// Single-threaded supervisor loop.
///
/// Selects over three inputs, in priority order:
/// 1. interrupt (`shutdown_rx`)
/// 2. classified actions and watcher failures (`event_rx`)
/// 3. the debounce deadline
///
/// All state (debouncer, child handle) is owned here. Pipeline runs are
/// awaited inline, so events that arrive during a build wait in the channel.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    options: RuntimeOptions,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    shutdown_rx: mpsc::Receiver<()>,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        options: RuntimeOptions,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        shutdown_rx: mpsc::Receiver<()>,
        executor: E,
    ) -> Self {
        Self {
            core,
            options,
            event_rx,
            shutdown_rx,
            executor,
        }
    }

    /// Main event loop.
    ///
    /// Returns the exit reason once the child has been stopped. A watcher
    /// failure is turned into `DevloopError::Watch`.
    pub async fn run(mut self) -> Result<ExitReason> {
        info!("devloop runtime started");

        self.startup().await?;

        let mut shutdown_open = true;

        loop {
            let armed = self.core.armed();

            let event = tokio::select! {
                biased;

                signal = self.shutdown_rx.recv(), if shutdown_open => match signal {
                    Some(()) => RuntimeEvent::ShutdownRequested,
                    None => {
                        debug!("shutdown channel closed; interrupts are no longer observed");
                        shutdown_open = false;
                        continue;
                    }
                },

                received = self.event_rx.recv() => match received {
                    Some(event) => event,
                    None => RuntimeEvent::SourceClosed,
                },

                generation = wait_for_deadline(armed) => {
                    RuntimeEvent::DeadlineElapsed { generation }
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event, Instant::now());

            let mut exit = None;
            for command in step.commands {
                if let Some(reason) = self.execute_command(command).await? {
                    exit = Some(reason);
                }
            }

            if !step.keep_running {
                let reason = exit.unwrap_or(ExitReason::Interrupted);
                info!(?reason, "runtime exiting");
                return match reason {
                    ExitReason::WatchFailed(message) => Err(DevloopError::Watch(message)),
                    other => Ok(other),
                };
            }
        }
    }

    async fn startup(&mut self) -> Result<()> {
        if self.options.build_on_start {
            info!("building before first start");
            self.run_from(0).await
        } else {
            self.executor.start_child().await
        }
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<Option<ExitReason>> {
        match command {
            CoreCommand::RunPipeline(stage) => {
                self.run_from(stage).await?;
                Ok(None)
            }
            CoreCommand::StopChild => {
                self.executor.stop_child().await?;
                Ok(None)
            }
            CoreCommand::RequestExit(reason) => Ok(Some(reason)),
        }
    }

    async fn run_from(&mut self, stage: usize) -> Result<()> {
        let outcome = run_pipeline(self.core.pipeline(), stage, &mut self.executor).await?;
        match outcome {
            PipelineOutcome::Restarted { stage } => debug!(stage, "pipeline restarted child"),
            PipelineOutcome::BuildFailed { stage, code } => {
                info!(stage, exit_code = code, "waiting for the next change")
            }
            PipelineOutcome::Completed => debug!("pipeline ended without a restart stage"),
        }
        Ok(())
    }
}

/// Resolve with `generation` at `deadline`, or never when nothing is armed.
///
/// Recreated on every loop iteration from the debouncer's current state;
/// the generation still travels with the expiry so the core can reject it
/// if it is no longer current.
async fn wait_for_deadline(armed: Option<(Instant, u64)>) -> u64 {
    match armed {
        Some((deadline, generation)) => {
            sleep_until(deadline).await;
            generation
        }
        None => std::future::pending().await,
    }
}
