#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use devloop::engine::{CoreRuntime, Debouncer, ExitReason, Runtime, RuntimeEvent, RuntimeOptions};
use devloop::errors::Result;
use devloop::pipeline::Pipeline;
pub use devloop_test_utils::fake_executor::{ExecLog, ExecOp, FakeExecutor};
pub use devloop_test_utils::init_tracing;

pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// A runtime driven by a `FakeExecutor`, running on its own task.
pub struct Harness {
    pub events: mpsc::Sender<RuntimeEvent>,
    pub shutdown: mpsc::Sender<()>,
    pub log: ExecLog,
    pub handle: JoinHandle<Result<ExitReason>>,
}

impl Harness {
    pub fn spawn(pipeline: Pipeline, options: RuntimeOptions) -> Self {
        Self::spawn_with(pipeline, options, |exec, _| exec)
    }

    /// `customize` gets the executor and the shutdown sender, so a test can
    /// make builds fail or raise an interrupt mid-build.
    pub fn spawn_with<F>(pipeline: Pipeline, options: RuntimeOptions, customize: F) -> Self
    where
        F: FnOnce(FakeExecutor, &mpsc::Sender<()>) -> FakeExecutor,
    {
        init_tracing();

        let (events, event_rx) = mpsc::channel::<RuntimeEvent>(64);
        let (shutdown, shutdown_rx) = mpsc::channel::<()>(1);
        let log = ExecLog::default();
        let executor = customize(FakeExecutor::new(log.clone()), &shutdown);

        let core = CoreRuntime::new(pipeline, Debouncer::new(DEBOUNCE));
        let runtime = Runtime::new(core, options, event_rx, shutdown_rx, executor);
        let handle = tokio::spawn(runtime.run());

        Self {
            events,
            shutdown,
            log,
            handle,
        }
    }

    /// Send a classified change, as the watcher would.
    pub async fn change(&self, stage: usize, path: &str) {
        self.events
            .send(RuntimeEvent::StageTriggered {
                stage,
                path: PathBuf::from(path),
            })
            .await
            .expect("runtime stopped receiving events");
    }

    /// Let the debounce window elapse (paused clock auto-advances).
    pub async fn settle(&self) {
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
    }

    /// Interrupt and wait for the loop to exit.
    pub async fn interrupt(self) -> (ExecLog, ExitReason) {
        self.shutdown.send(()).await.expect("runtime already gone");
        let reason = self
            .handle
            .await
            .expect("runtime task panicked")
            .expect("runtime returned an error");
        (self.log, reason)
    }
}
