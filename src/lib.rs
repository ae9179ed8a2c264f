// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod host;
pub mod logging;
pub mod resolve;
pub mod staleness;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{CopyEngine, CycleRunner, RunnerEvent};
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::DiskHost;
use crate::resolve::path_utils::absolutize;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and pattern validation, with CLI overrides applied
/// - the copy engine
/// - a disk host that writes assets under the output directory
/// - the cycle runner (one cycle, then shutdown)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    describe_config(&cfg);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let options = cfg.options();

    let mut global = options.global.clone();
    global.copy_unmodified |= args.copy_unmodified;
    let output = match &args.output {
        Some(dir) => absolutize(&std::env::current_dir()?, dir),
        None => options.output.clone(),
    };

    let engine = CopyEngine::from_patterns(cfg.patterns().to_vec(), global, Arc::clone(&fs))?;
    info!(patterns = engine.pattern_count(), output = ?output, "copy engine ready");
    let host = DiskHost::new(fs, options.context.clone(), output, args.dry_run);

    let (tx, rx) = mpsc::channel::<RunnerEvent>(8);

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RunnerEvent::ShutdownRequested).await;
        });
    }

    tx.send(RunnerEvent::CycleRequested).await?;
    tx.send(RunnerEvent::ShutdownRequested).await?;

    let summary = CycleRunner::new(engine, rx, host).run().await?;
    info!(cycles = summary.cycles, failed = summary.failed_cycles, "assetcopy finished");

    if summary.failed_cycles > 0 {
        bail!("{} of {} cycle(s) reported errors", summary.failed_cycles, summary.cycles);
    }
    Ok(())
}

fn describe_config(cfg: &ConfigFile) {
    let options = cfg.options();
    debug!(
        context = ?options.context,
        output = ?options.output,
        patterns = cfg.patterns().len(),
        global_ignore = options.global.ignore.len(),
        copy_unmodified = options.global.copy_unmodified,
        "loaded config"
    );
}
