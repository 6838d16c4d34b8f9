// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`build`] runs a single build command and reports its outcome.
//! - [`supervisor`] owns the one supervised child process.
//! - [`runner`] walks the pipeline from a triggered stage.
//! - [`backend`] provides the `ExecutorBackend` trait the runtime talks to,
//!   and the production `RealExecutorBackend`. Tests swap in a fake.

pub mod backend;
pub mod build;
pub mod runner;
pub mod supervisor;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use build::run_build_step;
pub use runner::{PipelineOutcome, run_pipeline};
pub use supervisor::Supervisor;
