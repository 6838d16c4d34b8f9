// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::engine::{CoreRuntime, Debouncer, ExitReason, Runtime, RuntimeEvent, RuntimeOptions};
use crate::errors::{DevloopError, Result};
use crate::exec::{RealExecutorBackend, Supervisor};
use crate::fs::RealFileSystem;
use crate::pipeline::StageAction;
use crate::types::ChildCommand;

pub use crate::config::Config;
pub use crate::pipeline::{BuildStep, Pipeline, PipelineStage};

/// Exit status after an interrupt-triggered shutdown.
pub const INTERRUPT_EXIT_CODE: i32 = 1;

/// Run the supervisor loop until interrupted or a fatal error occurs.
///
/// This wires together:
/// - watch pattern expansion
/// - the file watcher + classifier
/// - Ctrl-C handling
/// - the debounce core, runtime loop and real process executor
///
/// The child is always stopped before this returns.
pub async fn supervise(config: Config, child: ChildCommand) -> Result<ExitReason> {
    let paths = watch::expand_patterns(&RealFileSystem, config.patterns())?;
    if paths.is_empty() {
        warn!("no paths to watch; only interrupts will be handled");
    }

    // Runtime event channel. Only the watcher holds a sender, so the channel
    // closes when the watcher goes away.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let _watcher = watch::spawn_watcher(
        paths,
        config.is_recursive(),
        config.stages().clone(),
        rt_tx,
    )?;

    // Ctrl-C → shutdown channel, checked first on every loop iteration.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(()).await;
    });

    let supervisor = Supervisor::new(child, config.guard().clone());
    let executor = RealExecutorBackend::new(supervisor);

    let core = CoreRuntime::new(
        config.stages().clone(),
        Debouncer::new(config.debounce_delay()),
    );
    let options = RuntimeOptions {
        build_on_start: config.builds_on_start(),
    };

    let runtime = Runtime::new(core, options, rt_rx, shutdown_rx, executor);
    runtime.run().await
}

impl Config {
    /// Embedded entry point.
    ///
    /// Returns immediately unless the trigger marker is set to `"watch"`.
    /// In watch mode the current process becomes the watcher, relaunches
    /// itself (with the marker cleared) as the supervised child, and never
    /// returns: it exits with [`exit_code`] of the loop's exit reason, or
    /// prints the error and exits with status 1 on a fatal error.
    pub fn main(self) {
        if !self.guard().is_watch_mode() {
            return;
        }

        logging::try_init_logging(None);

        let code = match run_watch_mode(self) {
            Ok(reason) => {
                debug!(?reason, "watcher finished");
                exit_code(&reason)
            }
            Err(err) => {
                eprintln!("devloop error: {err}");
                1
            }
        };
        std::process::exit(code);
    }
}

fn run_watch_mode(config: Config) -> Result<ExitReason> {
    let child = ChildCommand::current_process()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(supervise(config, child))
}

/// High-level entry point used by `main.rs`.
///
/// Returns the process exit status.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(0);
    }

    let child = child_from_args(&args.command)?;
    info!(cmd = %child, "supervising");

    let reason = supervise(cfg, child).await?;
    Ok(exit_code(&reason))
}

/// Process status for a clean loop exit: `INTERRUPT_EXIT_CODE` after Ctrl-C,
/// 0 when the event source went away.
pub fn exit_code(reason: &ExitReason) -> i32 {
    match reason {
        ExitReason::Interrupted => INTERRUPT_EXIT_CODE,
        ExitReason::SourceClosed => 0,
        ExitReason::WatchFailed(_) => 1,
    }
}

fn child_from_args(command: &[String]) -> Result<ChildCommand> {
    let (program, args) = command.split_first().ok_or_else(|| {
        DevloopError::ConfigError("no command given; pass it after `--`".to_string())
    })?;
    Ok(ChildCommand::new(program, args))
}

/// Simple dry-run output: print the pipeline and the expanded watch paths.
fn print_dry_run(cfg: &Config) -> Result<()> {
    println!("devloop dry-run");
    println!("  config.env = {}", cfg.guard().marker());
    println!("  config.debounce = {:?}", cfg.debounce_delay());
    println!("  config.build_on_start = {}", cfg.builds_on_start());
    println!();

    println!("stages ({}):", cfg.stages().len());
    for (index, stage) in cfg.stages().stages().iter().enumerate() {
        match &stage.action {
            StageAction::Build(step) => println!("  {index}: *{} -> {step}", stage.suffix),
            StageAction::Restart => println!("  {index}: *{} -> restart", stage.suffix),
        }
    }
    println!();

    let paths = watch::expand_patterns(&RealFileSystem, cfg.patterns())?;
    println!(
        "watch ({} path(s), recursive = {}):",
        paths.len(),
        cfg.is_recursive()
    );
    for path in paths {
        println!("  - {}", path.display());
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
