// src/pipeline/mod.rs

//! Pipeline model for devloop.
//!
//! This module exposes:
//! - [`stage`]: the ordered stage list (`Pipeline`) and the tagged
//!   `StageAction` (build vs. restart).
//! - [`classify`]: suffix-based mapping from a changed path to a stage index.

pub mod classify;
pub mod stage;

pub use classify::classify_path;
pub use stage::{BuildStep, Pipeline, PipelineStage, StageAction, StageIndex};
