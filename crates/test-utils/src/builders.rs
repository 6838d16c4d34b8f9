use std::time::Duration;

use devloop::config::Config;
use devloop::pipeline::{BuildStep, Pipeline, PipelineStage};

/// Builder for `Pipeline` to simplify test setup.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<PipelineStage>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a build stage; `cmd` is split on whitespace.
    pub fn build(mut self, suffix: &str, cmd: &str) -> Self {
        let mut parts = cmd.split_whitespace();
        let program = parts.next().unwrap_or_default();
        self.stages
            .push(PipelineStage::build(suffix, BuildStep::new(program, parts)));
        self
    }

    pub fn restart(mut self, suffix: &str) -> Self {
        self.stages.push(PipelineStage::restart(suffix));
        self
    }

    pub fn build_pipeline(self) -> Pipeline {
        Pipeline::new(self.stages).expect("Failed to build valid pipeline from builder")
    }
}

/// A typical two-stage web app pipeline:
/// `.go` rebuilds with `go build`, `.html` only restarts.
pub fn go_pipeline() -> Pipeline {
    PipelineBuilder::new()
        .build(".go", "go build")
        .restart(".html")
        .build_pipeline()
}

/// Builder for `Config`.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            config: Config::default().pipeline(pipeline),
        }
    }

    pub fn watch(mut self, pattern: &str) -> Self {
        self.config = self.config.watch([pattern]);
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config = self.config.debounce(Duration::from_millis(ms));
        self
    }

    pub fn trigger_env(mut self, marker: &str) -> Self {
        self.config = self.config.trigger_env(marker);
        self
    }

    pub fn build_on_start(mut self, val: bool) -> Self {
        self.config = self.config.build_on_start(val);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
