use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use devloop::engine::StepOutcome;
use devloop::errors::Result;
use devloop::exec::ExecutorBackend;
use devloop::pipeline::BuildStep;

/// One call observed by the fake executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOp {
    /// A build ran; the full command line.
    Build(String),
    /// A child was started.
    Start,
    /// A live child was stopped.
    Stop,
}

#[derive(Debug, Default)]
struct LogState {
    ops: Vec<ExecOp>,
    live: usize,
    max_live: usize,
}

/// Shared view of what the fake executor did.
#[derive(Debug, Clone, Default)]
pub struct ExecLog {
    state: Arc<Mutex<LogState>>,
}

impl ExecLog {
    pub fn ops(&self) -> Vec<ExecOp> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn builds(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ExecOp::Build(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, op: &ExecOp) -> usize {
        self.state.lock().unwrap().ops.iter().filter(|o| *o == op).count()
    }

    /// Children currently alive.
    pub fn live(&self) -> usize {
        self.state.lock().unwrap().live
    }

    /// Highest number of children ever alive at once.
    pub fn max_live(&self) -> usize {
        self.state.lock().unwrap().max_live
    }
}

/// A fake executor that:
/// - records builds, starts and stops in an [`ExecLog`]
/// - fails builds whose command line is in `failing`
/// - can raise an interrupt while a build is running
///
/// `start_child` does **not** stop a live child first, so a runtime that
/// forgets to stop before starting shows up as `max_live() > 1`.
pub struct FakeExecutor {
    log: ExecLog,
    failing: HashSet<String>,
    interrupt_during_build: Option<mpsc::Sender<()>>,
}

impl FakeExecutor {
    pub fn new(log: ExecLog) -> Self {
        Self {
            log,
            failing: HashSet::new(),
            interrupt_during_build: None,
        }
    }

    pub fn fail_build(mut self, cmd: &str) -> Self {
        self.failing.insert(cmd.to_string());
        self
    }

    /// Send on `shutdown_tx` from inside the next build.
    pub fn interrupt_during_build(mut self, shutdown_tx: mpsc::Sender<()>) -> Self {
        self.interrupt_during_build = Some(shutdown_tx);
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn run_build(
        &mut self,
        step: BuildStep,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + '_>> {
        let cmd = step.to_string();
        let failed = self.failing.contains(&cmd);
        let interrupt = self.interrupt_during_build.take();
        let log = self.log.clone();

        Box::pin(async move {
            log.state.lock().unwrap().ops.push(ExecOp::Build(cmd));

            if let Some(tx) = interrupt {
                tx.send(()).await.map_err(anyhow::Error::from)?;
                // The build keeps going after the interrupt arrives.
                tokio::task::yield_now().await;
            }

            Ok(if failed {
                StepOutcome::Failed(2)
            } else {
                StepOutcome::Success
            })
        })
    }

    fn start_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let log = self.log.clone();
        Box::pin(async move {
            let mut state = log.state.lock().unwrap();
            state.ops.push(ExecOp::Start);
            state.live += 1;
            state.max_live = state.max_live.max(state.live);
            Ok(())
        })
    }

    fn stop_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let log = self.log.clone();
        Box::pin(async move {
            let mut state = log.state.lock().unwrap();
            if state.live > 0 {
                state.ops.push(ExecOp::Stop);
                state.live -= 1;
            }
            Ok(())
        })
    }
}
