// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::core::CopyEngine;
use crate::engine::cycle::{BuildCycle, CycleError};
use crate::engine::report::CycleReport;
use crate::errors::Result;

/// Events that drive the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEvent {
    /// Run one full cycle (pre-emit, emit, post-emit).
    CycleRequested,
    /// Stop after the current cycle.
    ShutdownRequested,
}

/// The host side of a build cycle.
///
/// The runner asks the host for a fresh [`BuildCycle`], lets it emit the
/// assets between the two engine phases, and hands the settled cycle back.
pub trait CycleHost: Send {
    fn begin_cycle(&mut self) -> BuildCycle;

    /// Materialise `cycle.assets`. Per-asset failures should be pushed onto
    /// `cycle.errors`; an `Err` is recorded as a cycle error by the runner.
    fn emit<'a>(
        &'a mut self,
        cycle: &'a mut BuildCycle,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    fn finish_cycle(&mut self, cycle: BuildCycle, report: CycleReport);
}

/// Totals over all cycles a runner executed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub failed_cycles: usize,
}

/// Drives a [`CopyEngine`] in response to [`RunnerEvent`]s.
///
/// Events are handled one at a time and every cycle settles completely before
/// the next event is read, so cycles can never overlap.
pub struct CycleRunner<H: CycleHost> {
    engine: CopyEngine,
    event_rx: mpsc::Receiver<RunnerEvent>,
    host: H,
}

impl<H: CycleHost> fmt::Debug for CycleRunner<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleRunner")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<H: CycleHost> CycleRunner<H> {
    pub fn new(engine: CopyEngine, event_rx: mpsc::Receiver<RunnerEvent>, host: H) -> Self {
        Self {
            engine,
            event_rx,
            host,
        }
    }

    /// Main event loop. Returns when shutdown is requested or every sender
    /// has been dropped.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("assetcopy runner started");
        let mut summary = RunSummary::default();

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runner event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runner received event");

            match event {
                RunnerEvent::CycleRequested => {
                    let failed = self.run_cycle().await?;
                    summary.cycles += 1;
                    if failed {
                        summary.failed_cycles += 1;
                    }
                }
                RunnerEvent::ShutdownRequested => {
                    info!("shutdown requested; exiting runner");
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Run one cycle to completion. Returns true if it ended with errors.
    async fn run_cycle(&mut self) -> Result<bool> {
        let mut cycle = self.host.begin_cycle();

        let report = self.engine.run_pre_emit(&mut cycle)?;

        if let Err(e) = self.host.emit(&mut cycle).await {
            warn!(error = %e, "emit failed");
            let output = cycle.output_path.clone();
            cycle.errors.push(CycleError::new(output, e.to_string()));
        }

        self.engine.run_post_emit(&mut cycle)?;

        let failed = cycle.has_errors();
        if failed {
            warn!(errors = cycle.errors.len(), "cycle finished with errors");
        } else {
            info!(assets = cycle.assets.len(), "cycle finished");
        }

        self.host.finish_cycle(cycle, report);
        Ok(failed)
    }
}
