// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Every variant here is fatal for the supervisor loop. Build failures are
//! not errors: they come back as a `PipelineOutcome` and the loop carries on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevloopError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid watch pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("failed to watch {path:?}: {source}")]
    WatchPath {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("file watch error: {0}")]
    Watch(String),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop child process (pid {pid:?}): {source}")]
    Stop {
        pid: Option<u32>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to reap child process (pid {pid:?}): {source}")]
    Reap {
        pid: Option<u32>,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevloopError>;
