// src/exec/build.rs

//! Build command runner.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::engine::StepOutcome;
use crate::errors::Result;
use crate::pipeline::BuildStep;

/// Run `step` with inherited stdout/stderr and wait for it.
///
/// A command that cannot be launched counts as a failed build (`-1`), the
/// same as one that exits non-zero: the run is aborted, the loop carries on.
pub async fn run_build_step(step: BuildStep) -> Result<StepOutcome> {
    info!(cmd = %step, "building");

    let mut cmd = Command::new(&step.program);
    cmd.args(&step.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let status = match cmd.status().await {
        Ok(status) => status,
        Err(err) => {
            error!(cmd = %step, error = %err, "could not launch build command");
            return Ok(StepOutcome::Failed(-1));
        }
    };

    let code = status.code().unwrap_or(-1);
    debug!(cmd = %step, exit_code = code, success = status.success(), "build command exited");

    if status.success() {
        Ok(StepOutcome::Success)
    } else {
        Ok(StepOutcome::Failed(code))
    }
}
