// tests/debounce_properties.rs

mod common;

use std::time::Duration;

use proptest::prelude::*;
use tokio::time::Instant;

use devloop::engine::{Debouncer, RuntimeOptions};
use devloop_test_utils::builders::PipelineBuilder;
use devloop_test_utils::paused_runtime;

use crate::common::{DEBOUNCE, ExecOp, Harness};

const STAGES: usize = 4;

/// `.s0 .. .s{n-2}` are builds, the last stage restarts.
fn pipeline() -> devloop::pipeline::Pipeline {
    let mut builder = PipelineBuilder::new();
    for i in 0..STAGES - 1 {
        builder = builder.build(&format!(".s{i}"), &format!("build s{i}"));
    }
    builder.restart(".tpl").build_pipeline()
}

/// Stages `from..` that are builds, as the fake executor records them.
fn expected_builds(from: usize) -> Vec<String> {
    (from..STAGES - 1).map(|i| format!("build s{i}")).collect()
}

proptest! {
    // Pure debouncer: any burst inside the window fires once with the minimum.
    #[test]
    fn burst_fires_once_with_min_stage(
        stages in proptest::collection::vec(0..STAGES, 1..20),
        gaps in proptest::collection::vec(0u64..20, 20),
    ) {
        let mut debouncer = Debouncer::new(DEBOUNCE);
        let t0 = Instant::now();
        let mut at = t0;
        for (stage, gap) in stages.iter().zip(gaps.iter()) {
            at += Duration::from_millis(*gap);
            debouncer.record(*stage, at);
        }

        let (deadline, generation) = debouncer.armed().unwrap();
        prop_assert!(deadline <= at + DEBOUNCE);
        prop_assert_eq!(debouncer.fire(generation), Some(*stages.iter().min().unwrap()));
        prop_assert!(debouncer.armed().is_none());
    }

    // Full loop: one pipeline run from the minimum stage, never two children.
    #[test]
    fn runtime_runs_pipeline_once_per_window(
        stages in proptest::collection::vec(0..STAGES, 1..10),
    ) {
        let min = *stages.iter().min().unwrap();
        let (log, _) = paused_runtime().block_on(async {
            let h = Harness::spawn(pipeline(), RuntimeOptions::default());
            for stage in &stages {
                h.change(*stage, "changed").await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            h.settle().await;
            h.interrupt().await
        });

        prop_assert_eq!(log.builds(), expected_builds(min));
        prop_assert_eq!(log.count(&ExecOp::Start), 2);
        prop_assert_eq!(log.max_live(), 1);
        prop_assert_eq!(log.live(), 0);
    }

    // Arbitrary spacing and failing builds: still at most one live child.
    #[test]
    fn at_most_one_child_for_any_interleaving(
        actions in proptest::collection::vec((0..STAGES, 0u64..1200), 1..15),
        failing in proptest::collection::vec(0..STAGES - 1, 0..3),
    ) {
        let log = paused_runtime().block_on(async {
            let h = Harness::spawn_with(pipeline(), RuntimeOptions::default(), |mut exec, _| {
                for i in &failing {
                    exec = exec.fail_build(&format!("build s{i}"));
                }
                exec
            });
            for (stage, gap) in &actions {
                h.change(*stage, "changed").await;
                tokio::time::sleep(Duration::from_millis(*gap)).await;
            }
            h.settle().await;
            h.interrupt().await.0
        });

        prop_assert!(log.max_live() <= 1);
        prop_assert_eq!(log.live(), 0);
    }
}
