// src/pipeline/classify.rs

//! Event classifier: changed path -> stage index.

use std::path::Path;

use super::stage::{Pipeline, StageIndex};

/// Return the index of the **first** stage whose suffix matches `path`.
///
/// Order matters: with `[".go", ".html"]` a path is checked against `.go`
/// first. `None` means the change is irrelevant and should be dropped.
pub fn classify_path(pipeline: &Pipeline, path: &Path) -> Option<StageIndex> {
    let path = path.to_string_lossy();
    pipeline.stages().iter().position(|stage| stage.matches(&path))
}
