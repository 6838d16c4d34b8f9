// src/pipeline/stage.rs

use std::fmt;

use crate::errors::{DevloopError, Result};

/// Position of a stage in the pipeline. Lower is more disruptive.
pub type StageIndex = usize;

/// An external command run by a build stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildStep {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a stage does once it is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageAction {
    /// Run a command synchronously; a non-zero exit aborts the run.
    Build(BuildStep),
    /// Start the supervised child and end the run.
    Restart,
}

/// A suffix matcher plus the action to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStage {
    pub suffix: String,
    pub action: StageAction,
}

impl PipelineStage {
    pub fn build(suffix: impl Into<String>, step: BuildStep) -> Self {
        Self {
            suffix: suffix.into(),
            action: StageAction::Build(step),
        }
    }

    pub fn restart(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            action: StageAction::Restart,
        }
    }

    pub fn is_restart(&self) -> bool {
        matches!(self.action, StageAction::Restart)
    }

    pub fn matches(&self, path: &str) -> bool {
        path.ends_with(&self.suffix)
    }
}

/// Ordered, validated list of stages.
///
/// Invariants (checked by [`Pipeline::new`]):
/// - at least one stage
/// - every suffix is non-empty
/// - every build stage names a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<PipelineStage>,
}

impl Pipeline {
    pub fn new(stages: Vec<PipelineStage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(DevloopError::ConfigError(
                "pipeline must contain at least one stage".to_string(),
            ));
        }

        for (index, stage) in stages.iter().enumerate() {
            if stage.suffix.is_empty() {
                return Err(DevloopError::ConfigError(format!(
                    "stage {index} has an empty suffix"
                )));
            }
            if let StageAction::Build(step) = &stage.action {
                if step.program.trim().is_empty() {
                    return Err(DevloopError::ConfigError(format!(
                        "stage {index} ('{}') has an empty build command",
                        stage.suffix
                    )));
                }
            }
        }

        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn get(&self, index: StageIndex) -> Option<&PipelineStage> {
        self.stages.get(index)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for Pipeline {
    /// `.rs` changes rebuild with `cargo build`, `.html` changes only restart.
    fn default() -> Self {
        Self {
            stages: vec![
                PipelineStage::build(".rs", BuildStep::new("cargo", ["build"])),
                PipelineStage::restart(".html"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_pipeline() {
        let err = Pipeline::new(Vec::new()).unwrap_err();
        assert!(matches!(err, DevloopError::ConfigError(msg) if msg.contains("at least one")));
    }

    #[test]
    fn rejects_empty_suffix_and_program() {
        assert!(Pipeline::new(vec![PipelineStage::restart("")]).is_err());
        assert!(Pipeline::new(vec![PipelineStage::build(".rs", BuildStep::new(" ", ["x"]))]).is_err());
    }

    #[test]
    fn default_pipeline_builds_then_restarts() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.get(0).unwrap().is_restart());
        assert!(pipeline.get(1).unwrap().is_restart());
        assert!(pipeline.get(2).is_none());
    }

    #[test]
    fn display_joins_program_and_args() {
        let step = BuildStep::new("go", ["build", "-o", "app"]);
        assert_eq!(step.to_string(), "go build -o app");
    }
}
