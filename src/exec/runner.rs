// src/exec/runner.rs

//! Pipeline executor.

use tracing::{debug, error};

use crate::engine::StepOutcome;
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::pipeline::{Pipeline, StageAction, StageIndex};

/// How a pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A restart stage started a new child.
    Restarted { stage: StageIndex },
    /// A build stage failed; no child is running.
    BuildFailed { stage: StageIndex, code: i32 },
    /// Ran off the end of the list without reaching a restart stage.
    Completed,
}

/// Stop the current child, then run stages `from..` in order.
///
/// Stops at the first restart stage (after starting the child), at the first
/// failing build stage, or at the end of the list.
pub async fn run_pipeline<E>(
    pipeline: &Pipeline,
    from: StageIndex,
    executor: &mut E,
) -> Result<PipelineOutcome>
where
    E: ExecutorBackend + ?Sized,
{
    executor.stop_child().await?;

    for (index, stage) in pipeline.stages().iter().enumerate().skip(from) {
        match &stage.action {
            StageAction::Build(step) => {
                if let StepOutcome::Failed(code) = executor.run_build(step.clone()).await? {
                    error!(stage = index, cmd = %step, exit_code = code, "build failed");
                    return Ok(PipelineOutcome::BuildFailed { stage: index, code });
                }
            }
            StageAction::Restart => {
                executor.start_child().await?;
                return Ok(PipelineOutcome::Restarted { stage: index });
            }
        }
    }

    debug!(from, "no restart stage after trigger");
    Ok(PipelineOutcome::Completed)
}
