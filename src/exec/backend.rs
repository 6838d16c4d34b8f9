// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime never touches processes directly: it asks an
//! `ExecutorBackend` to run a build, start the child or stop the child.
//! `RealExecutorBackend` does this with `tokio::process`; tests provide a
//! backend that records the calls instead.

use std::future::Future;
use std::pin::Pin;

use crate::engine::StepOutcome;
use crate::errors::Result;
use crate::pipeline::BuildStep;

use super::build::run_build_step;
use super::supervisor::Supervisor;

/// Trait abstracting how stages and the supervised child are executed.
pub trait ExecutorBackend: Send {
    /// Run a build command to completion.
    ///
    /// A failing command is `Ok(StepOutcome::Failed(_))`; `Err` is reserved
    /// for fatal conditions.
    fn run_build(
        &mut self,
        step: BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>>;

    /// Start a fresh supervised child.
    fn start_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Stop the supervised child if one is running. Idempotent.
    fn stop_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
#[derive(Debug)]
pub struct RealExecutorBackend {
    supervisor: Supervisor,
}

impl RealExecutorBackend {
    pub fn new(supervisor: Supervisor) -> Self {
        Self { supervisor }
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn run_build(
        &mut self,
        step: BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>> {
        Box::pin(run_build_step(step))
    }

    fn start_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.supervisor.start())
    }

    fn stop_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.supervisor.stop())
    }
}
