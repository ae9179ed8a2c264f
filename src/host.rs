// src/host.rs

//! A host that materialises the asset set on disk.
//!
//! The engine only fills an in-memory asset set; `DiskHost` is the glue the
//! CLI uses to write it under the output directory. Files whose current
//! content already has the asset's blake3 digest are left untouched.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::cycle::{Asset, BuildCycle, CycleError};
use crate::engine::report::CycleReport;
use crate::engine::runtime::CycleHost;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::resolve::path_utils::normalize;

/// What happened to one asset during emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitAction {
    Written,
    Unchanged,
    DryRun,
}

/// Outcome of one settled cycle, kept for callers and tests.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub report: CycleReport,
    pub emitted: Vec<(String, EmitAction)>,
    pub errors: Vec<CycleError>,
    pub file_dependencies: Vec<PathBuf>,
    pub context_dependencies: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct DiskHost {
    fs: Arc<dyn FileSystem>,
    context: PathBuf,
    output: PathBuf,
    dry_run: bool,
    emitted: Vec<(String, EmitAction)>,
    outcomes: Vec<CycleOutcome>,
}

impl DiskHost {
    pub fn new(fs: Arc<dyn FileSystem>, context: PathBuf, output: PathBuf, dry_run: bool) -> Self {
        Self {
            fs,
            context,
            output,
            dry_run,
            emitted: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn outcomes(&self) -> &[CycleOutcome] {
        &self.outcomes
    }

    fn emit_one(&self, key: &str, asset: &Asset) -> anyhow::Result<EmitAction> {
        let target = normalize(&self.output.join(key));

        if self.dry_run {
            println!("{key} <- {}", source_label(asset.source()));
            return Ok(EmitAction::DryRun);
        }

        if self.fs.is_file(&target) {
            let current = self.fs.read(&target)?;
            if blake3::hash(&current).to_hex().as_str() == asset.digest() {
                debug!(%key, "output already up to date");
                return Ok(EmitAction::Unchanged);
            }
        }

        self.fs.write(&target, asset.content())?;
        debug!(%key, target = ?target, size = asset.size(), "wrote asset");
        Ok(EmitAction::Written)
    }
}

fn source_label(source: Option<&Path>) -> String {
    match source {
        Some(p) => p.display().to_string(),
        None => "<generated>".to_string(),
    }
}

impl CycleHost for DiskHost {
    fn begin_cycle(&mut self) -> BuildCycle {
        self.emitted.clear();
        BuildCycle::new(self.context.clone(), self.output.clone())
    }

    fn emit<'a>(
        &'a mut self,
        cycle: &'a mut BuildCycle,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut failures = Vec::new();

            for (key, asset) in cycle.assets.iter() {
                match self.emit_one(key, asset) {
                    Ok(action) => self.emitted.push((key.to_string(), action)),
                    Err(e) => failures.push(CycleError::new(self.output.join(key), format!("{e:#}"))),
                }
            }

            cycle.errors.extend(failures);
            Ok(())
        })
    }

    fn finish_cycle(&mut self, cycle: BuildCycle, report: CycleReport) {
        let written = self
            .emitted
            .iter()
            .filter(|(_, a)| *a == EmitAction::Written)
            .count();
        info!(%report, written, output = ?self.output, "cycle settled");

        self.outcomes.push(CycleOutcome {
            report,
            emitted: std::mem::take(&mut self.emitted),
            errors: cycle.errors,
            file_dependencies: cycle.file_dependencies.iter().map(Path::to_path_buf).collect(),
            context_dependencies: cycle
                .context_dependencies
                .iter()
                .map(Path::to_path_buf)
                .collect(),
        });
    }
}
