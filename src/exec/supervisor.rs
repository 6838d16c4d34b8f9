// src/exec/supervisor.rs

//! Owner of the supervised child process.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::errors::{DevloopError, Result};
use crate::types::{ChildCommand, TriggerGuard};

/// Holds at most one running child.
///
/// - [`Supervisor::stop`] kills and reaps the child; a no-op without one.
/// - [`Supervisor::start`] stops any existing child first, then spawns
///   `command` with inherited stdout/stderr and the trigger marker cleared.
#[derive(Debug)]
pub struct Supervisor {
    command: ChildCommand,
    guard: TriggerGuard,
    child: Option<Child>,
}

impl Supervisor {
    pub fn new(command: ChildCommand, guard: TriggerGuard) -> Self {
        Self {
            command,
            guard,
            child: None,
        }
    }

    pub fn command(&self) -> &ChildCommand {
        &self.command
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    pub async fn start(&mut self) -> Result<()> {
        if self.child.is_some() {
            self.stop().await?;
        }

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        self.guard.apply(&mut cmd);

        info!(cmd = %self.command, "starting");

        let child = cmd.spawn().map_err(|source| DevloopError::Spawn {
            program: self.command.program.to_string_lossy().into_owned(),
            source,
        })?;

        debug!(pid = ?child.id(), "child process started");
        self.child = Some(child);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let pid = child.id();

        match child.try_wait() {
            Ok(Some(status)) => {
                info!(?pid, %status, "child had already exited");
                return Ok(());
            }
            Ok(None) => {}
            Err(source) => return Err(DevloopError::Reap { pid, source }),
        }

        info!(?pid, "stopping");

        child
            .start_kill()
            .map_err(|source| DevloopError::Stop { pid, source })?;

        let status = child
            .wait()
            .await
            .map_err(|source| DevloopError::Reap { pid, source })?;

        debug!(?pid, %status, "child process reaped");
        Ok(())
    }
}
