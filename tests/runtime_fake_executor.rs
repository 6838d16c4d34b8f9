// tests/runtime_fake_executor.rs

mod common;

use std::time::Duration;

use devloop::engine::{ExitReason, RuntimeOptions};
use devloop_test_utils::builders::{PipelineBuilder, go_pipeline};

use crate::common::{ExecOp, Harness};

#[tokio::test(start_paused = true)]
async fn child_is_started_at_startup() {
    let h = Harness::spawn(go_pipeline(), RuntimeOptions::default());
    h.settle().await;

    assert_eq!(h.log.ops(), vec![ExecOp::Start]);

    let (log, reason) = h.interrupt().await;
    assert_eq!(reason, ExitReason::Interrupted);
    assert_eq!(log.ops(), vec![ExecOp::Start, ExecOp::Stop]);
}

#[tokio::test(start_paused = true)]
async fn build_on_start_runs_the_whole_pipeline() {
    let h = Harness::spawn(
        go_pipeline(),
        RuntimeOptions {
            build_on_start: true,
        },
    );
    h.settle().await;

    assert_eq!(
        h.log.ops(),
        vec![ExecOp::Build("go build".into()), ExecOp::Start]
    );
    h.interrupt().await;
}

// A `.go` change rebuilds and then restarts.
#[tokio::test(start_paused = true)]
async fn source_change_rebuilds_then_restarts() {
    let h = Harness::spawn(go_pipeline(), RuntimeOptions::default());
    h.change(0, "main.go").await;
    h.settle().await;

    assert_eq!(
        h.log.ops(),
        vec![
            ExecOp::Start,
            ExecOp::Stop,
            ExecOp::Build("go build".into()),
            ExecOp::Start,
        ]
    );

    let (log, _) = h.interrupt().await;
    assert_eq!(log.live(), 0);
    assert_eq!(log.max_live(), 1);
}

// Three quick `.go` changes collapse into one rebuild-and-restart.
#[tokio::test(start_paused = true)]
async fn rapid_changes_collapse_into_one_run() {
    let h = Harness::spawn(go_pipeline(), RuntimeOptions::default());

    for _ in 0..3 {
        h.change(0, "main.go").await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    h.settle().await;

    assert_eq!(h.log.builds(), vec!["go build".to_string()]);
    assert_eq!(h.log.count(&ExecOp::Start), 2);
    h.interrupt().await;
}

// After a full run, a template change opens a new window at stage 1 and
// only restarts.
#[tokio::test(start_paused = true)]
async fn template_change_after_run_only_restarts() {
    let h = Harness::spawn(go_pipeline(), RuntimeOptions::default());

    h.change(0, "main.go").await;
    h.settle().await;
    h.change(1, "templates/index.html").await;
    h.settle().await;

    assert_eq!(
        h.log.ops(),
        vec![
            ExecOp::Start,
            ExecOp::Stop,
            ExecOp::Build("go build".into()),
            ExecOp::Start,
            ExecOp::Stop,
            ExecOp::Start,
        ]
    );
    h.interrupt().await;
}

// A failing build ends the run; the child stays stopped until the next
// change, which gets a fresh run.
#[tokio::test(start_paused = true)]
async fn failed_build_leaves_child_stopped() {
    let pipeline = PipelineBuilder::new()
        .build(".go", "go vet")
        .build(".go", "go build")
        .restart(".html")
        .build_pipeline();
    let h = Harness::spawn_with(pipeline, RuntimeOptions::default(), |exec, _| {
        exec.fail_build("go vet")
    });

    h.change(0, "main.go").await;
    h.settle().await;

    assert_eq!(
        h.log.ops(),
        vec![ExecOp::Start, ExecOp::Stop, ExecOp::Build("go vet".into())]
    );
    assert_eq!(h.log.live(), 0);

    // The next change is handled independently.
    h.change(0, "main.go").await;
    h.settle().await;
    assert_eq!(h.log.builds(), vec!["go vet".to_string(), "go vet".to_string()]);
    assert_eq!(h.log.live(), 0);

    // A template change skips the failing build entirely.
    h.change(2, "index.html").await;
    h.settle().await;
    assert_eq!(h.log.live(), 1);

    let (log, _) = h.interrupt().await;
    assert_eq!(log.live(), 0);
    assert_eq!(log.max_live(), 1);
}

#[tokio::test(start_paused = true)]
async fn less_disruptive_change_does_not_postpone_deadline() {
    let h = Harness::spawn(go_pipeline(), RuntimeOptions::default());

    h.change(0, "main.go").await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    h.change(1, "index.html").await;
    // 550ms after the first change: the first deadline has passed.
    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(h.log.builds(), vec!["go build".to_string()]);
    assert_eq!(h.log.count(&ExecOp::Start), 2);

    // The absorbed template change does not produce a second run.
    h.settle().await;
    assert_eq!(h.log.count(&ExecOp::Start), 2);
    h.interrupt().await;
}

#[tokio::test(start_paused = true)]
async fn more_disruptive_change_upgrades_pending_action() {
    let h = Harness::spawn(go_pipeline(), RuntimeOptions::default());

    h.change(1, "index.html").await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    h.change(0, "main.go").await;
    // The template deadline (500ms) was replaced by the source deadline (900ms).
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.log.ops(), vec![ExecOp::Start]);

    h.settle().await;
    assert_eq!(h.log.builds(), vec!["go build".to_string()]);
    assert_eq!(h.log.count(&ExecOp::Start), 2);
    h.interrupt().await;
}

#[tokio::test(start_paused = true)]
async fn pipeline_without_restart_stage_leaves_no_child() {
    let pipeline = PipelineBuilder::new()
        .build(".proto", "buf generate")
        .build_pipeline();
    let h = Harness::spawn(pipeline, RuntimeOptions::default());

    h.change(0, "api.proto").await;
    h.settle().await;

    assert_eq!(
        h.log.ops(),
        vec![
            ExecOp::Start,
            ExecOp::Stop,
            ExecOp::Build("buf generate".into())
        ]
    );
    assert_eq!(h.log.live(), 0);
    h.interrupt().await;
}
