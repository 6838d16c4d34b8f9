// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::pipeline::Pipeline;
use crate::types::{DEFAULT_TRIGGER_ENV, TriggerGuard};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// env = "DEVLOOP"
/// debounce_ms = 500
///
/// [watch]
/// patterns = ["src", "templates/*"]
///
/// [[stage]]
/// suffix = ".rs"
/// cmd = "cargo"
/// args = ["build"]
///
/// [[stage]]
/// suffix = ".html"
/// restart = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub watch: WatchSection,

    /// Ordered `[[stage]]` entries.
    #[serde(default, rename = "stage")]
    pub stages: Vec<RawStage>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Name of the trigger marker environment variable.
    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Run the pipeline from stage 0 at startup instead of just starting
    /// the child.
    #[serde(default)]
    pub build_on_start: bool,
}

fn default_env() -> String {
    DEFAULT_TRIGGER_ENV.to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            env: default_env(),
            debounce_ms: default_debounce_ms(),
            build_on_start: false,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Glob patterns, expanded once at startup.
    #[serde(default)]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub recursive: bool,
}

/// One `[[stage]]` entry. Exactly one of `cmd` / `restart = true`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStage {
    pub suffix: String,

    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub restart: bool,
}

/// Validated, immutable supervisor configuration.
///
/// Build one with [`Config::default`] and the builder methods, or load it
/// from TOML via [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct Config {
    guard: TriggerGuard,
    patterns: Vec<String>,
    recursive: bool,
    debounce: Duration,
    pipeline: Pipeline,
    build_on_start: bool,
}

impl Default for Config {
    /// Marker `DEVLOOP`, 500ms debounce, `.rs -> cargo build`,
    /// `.html -> restart`, nothing watched yet.
    fn default() -> Self {
        Self {
            guard: TriggerGuard::default(),
            patterns: Vec::new(),
            recursive: false,
            debounce: Duration::from_millis(default_debounce_ms()),
            pipeline: Pipeline::default(),
            build_on_start: false,
        }
    }
}

impl Config {
    pub(crate) fn new_unchecked(
        guard: TriggerGuard,
        patterns: Vec<String>,
        recursive: bool,
        debounce: Duration,
        pipeline: Pipeline,
        build_on_start: bool,
    ) -> Self {
        Self {
            guard,
            patterns,
            recursive,
            debounce,
            pipeline,
            build_on_start,
        }
    }

    /// Add paths to watch. Glob patterns are allowed.
    pub fn watch<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn trigger_env(mut self, marker: impl Into<String>) -> Self {
        self.guard = TriggerGuard::new(marker);
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn build_on_start(mut self, enabled: bool) -> Self {
        self.build_on_start = enabled;
        self
    }

    pub fn guard(&self) -> &TriggerGuard {
        &self.guard
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debounce
    }

    pub fn stages(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn builds_on_start(&self) -> bool {
        self.build_on_start
    }
}
