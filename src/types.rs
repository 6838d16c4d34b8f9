// src/types.rs

use std::ffi::OsString;
use std::fmt;

use anyhow::Context;

use crate::errors::Result;

/// Value the trigger marker must hold for a process to become the watcher.
pub const WATCH_SENTINEL: &str = "watch";

/// Default name of the trigger marker environment variable.
pub const DEFAULT_TRIGGER_ENV: &str = "DEVLOOP";

/// Re-entrancy guard.
///
/// A process runs as the watcher only when the environment variable named
/// `marker` equals [`WATCH_SENTINEL`]. Every child the supervisor spawns gets
/// the marker cleared via [`TriggerGuard::apply`], so the child runs its
/// normal application logic instead of starting another watcher.
///
/// The guard never mutates the watcher's own environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerGuard {
    marker: String,
}

impl TriggerGuard {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether the current process should enter watch mode.
    pub fn is_watch_mode(&self) -> bool {
        self.is_watch_value(std::env::var_os(&self.marker))
    }

    /// Decide watch mode from an explicit marker value.
    pub fn is_watch_value(&self, value: Option<OsString>) -> bool {
        !self.marker.is_empty() && value.is_some_and(|v| v == WATCH_SENTINEL)
    }

    /// Clear the marker in a child's environment.
    pub fn apply(&self, cmd: &mut tokio::process::Command) {
        if !self.marker.is_empty() {
            cmd.env(&self.marker, "");
        }
    }
}

impl Default for TriggerGuard {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_ENV)
    }
}

/// The program the supervisor launches on every restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl ChildCommand {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Relaunch the current executable with the current arguments.
    pub fn current_process() -> Result<Self> {
        let program = std::env::current_exe().context("resolving current executable")?;
        let args = std::env::args_os().skip(1);
        Ok(Self::new(program, args))
    }
}

impl fmt::Display for ChildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
