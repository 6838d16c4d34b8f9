// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{Config, RawConfigFile, RawStage};
use crate::errors::{DevloopError, Result};
use crate::pipeline::{BuildStep, Pipeline, PipelineStage};
use crate::types::TriggerGuard;

impl TryFrom<RawConfigFile> for Config {
    type Error = DevloopError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        let pipeline = build_pipeline(&raw.stages)?;

        Ok(Config::new_unchecked(
            TriggerGuard::new(raw.config.env),
            raw.watch.patterns,
            raw.watch.recursive,
            Duration::from_millis(raw.config.debounce_ms),
            pipeline,
            raw.config.build_on_start,
        ))
    }
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.env.trim().is_empty() {
        return Err(DevloopError::ConfigError(
            "[config].env must name an environment variable".to_string(),
        ));
    }

    if cfg.config.debounce_ms == 0 {
        return Err(DevloopError::ConfigError(
            "[config].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.stages.is_empty() {
        return Err(DevloopError::ConfigError(
            "config must contain at least one [[stage]] section".to_string(),
        ));
    }

    Ok(())
}

fn build_pipeline(raw: &[RawStage]) -> Result<Pipeline> {
    let stages = raw
        .iter()
        .enumerate()
        .map(|(index, stage)| build_stage(index, stage))
        .collect::<Result<Vec<_>>>()?;

    Pipeline::new(stages)
}

fn build_stage(index: usize, raw: &RawStage) -> Result<PipelineStage> {
    match (&raw.cmd, raw.restart) {
        (Some(_), true) => Err(DevloopError::ConfigError(format!(
            "stage {index} ('{}') sets both `cmd` and `restart = true`",
            raw.suffix
        ))),
        (None, false) => Err(DevloopError::ConfigError(format!(
            "stage {index} ('{}') needs either `cmd` or `restart = true`",
            raw.suffix
        ))),
        (None, true) if !raw.args.is_empty() => Err(DevloopError::ConfigError(format!(
            "stage {index} ('{}') is a restart stage and cannot take `args`",
            raw.suffix
        ))),
        (None, true) => Ok(PipelineStage::restart(raw.suffix.clone())),
        (Some(cmd), false) => Ok(PipelineStage::build(
            raw.suffix.clone(),
            BuildStep::new(cmd.clone(), raw.args.iter().cloned()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StageAction;

    fn parse(src: &str) -> Result<Config> {
        let raw: RawConfigFile = toml::from_str(src)?;
        Config::try_from(raw)
    }

    #[test]
    fn parses_full_config() {
        let cfg = parse(
            r#"
[config]
env = "DEAD"
debounce_ms = 250
build_on_start = true

[watch]
patterns = ["src", "templates/*.html"]
recursive = true

[[stage]]
suffix = ".go"
cmd = "go"
args = ["build"]

[[stage]]
suffix = ".html"
restart = true
"#,
        )
        .unwrap();

        assert_eq!(cfg.guard().marker(), "DEAD");
        assert_eq!(cfg.debounce_delay(), Duration::from_millis(250));
        assert!(cfg.builds_on_start());
        assert!(cfg.is_recursive());
        assert_eq!(cfg.patterns(), ["src", "templates/*.html"]);
        assert_eq!(cfg.stages().len(), 2);
        assert_eq!(
            cfg.stages().stages()[0].action,
            StageAction::Build(BuildStep::new("go", ["build"]))
        );
        assert!(cfg.stages().stages()[1].is_restart());
    }

    #[test]
    fn defaults_apply_when_sections_missing() {
        let cfg = parse(
            r#"
[[stage]]
suffix = ".html"
restart = true
"#,
        )
        .unwrap();

        assert_eq!(cfg.guard().marker(), "DEVLOOP");
        assert_eq!(cfg.debounce_delay(), Duration::from_millis(500));
        assert!(!cfg.is_recursive());
        assert!(cfg.patterns().is_empty());
    }

    #[test]
    fn stage_needs_exactly_one_action() {
        let both = parse(
            r#"
[[stage]]
suffix = ".go"
cmd = "go"
restart = true
"#,
        );
        assert!(matches!(both, Err(DevloopError::ConfigError(m)) if m.contains("both")));

        let neither = parse(
            r#"
[[stage]]
suffix = ".go"
"#,
        );
        assert!(matches!(neither, Err(DevloopError::ConfigError(m)) if m.contains("either")));
    }

    #[test]
    fn zero_debounce_is_rejected() {
        let res = parse(
            r#"
[config]
debounce_ms = 0

[[stage]]
suffix = ".html"
restart = true
"#,
        );
        assert!(matches!(res, Err(DevloopError::ConfigError(m)) if m.contains("debounce_ms")));
    }

    #[test]
    fn missing_stages_is_rejected() {
        let res = parse("[watch]\npatterns = [\".\"]\n");
        assert!(matches!(res, Err(DevloopError::ConfigError(m)) if m.contains("[[stage]]")));
    }
}
