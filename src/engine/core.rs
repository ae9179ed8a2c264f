// src/engine/core.rs

//! The copy orchestrator.
//!
//! [`CopyEngine`] owns the validated patterns and the staleness table and is
//! driven by the host through two entry points per cycle:
//!
//! 1. [`CopyEngine::run_pre_emit`] resolves every pattern in declaration
//!    order, filters unchanged files, maps destinations and writes assets.
//! 2. [`CopyEngine::run_post_emit`] re-adds the dependencies contributed in
//!    phase 1 to the cycle's lists, in case the host rebuilt them in between.
//!    No filesystem access happens here.
//!
//! Cycles must not overlap. Per-file failures become [`CycleError`]s on the
//! cycle; only configuration problems are returned as `Err`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::model::{GlobalOptions, Pattern, ToType};
use crate::config::validate::{validate_pattern, validate_patterns};
use crate::engine::cycle::{Asset, BuildCycle, CycleError, DependencyList};
use crate::engine::report::CycleReport;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::resolve::glob::{resolve_from, FromKind};
use crate::resolve::ignore::IgnoreSet;
use crate::resolve::mapper::{infer_to_type, map_destination, Destination};
use crate::resolve::path_utils::{absolutize, normalize};
use crate::staleness::StalenessTable;

/// A pattern with its merged (global + own) ignore filters compiled.
#[derive(Debug, Clone)]
struct CompiledPattern {
    index: usize,
    pattern: Pattern,
    ignore: IgnoreSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CyclePhase {
    Idle,
    PreEmitDone,
}

/// Dependencies added during the current cycle's phase 1.
#[derive(Debug, Default)]
struct Contributed {
    files: DependencyList,
    contexts: DependencyList,
}

#[derive(Debug)]
pub struct CopyEngine {
    patterns: Vec<CompiledPattern>,
    options: GlobalOptions,
    fs: Arc<dyn FileSystem>,
    staleness: StalenessTable,
    contributed: Contributed,
    phase: CyclePhase,
}

impl CopyEngine {
    /// Build an engine from the untyped `patterns` argument.
    ///
    /// `None` and `[]` give an engine that produces nothing. Anything that is
    /// not an array fails with a configuration error.
    pub fn new(
        patterns: Option<&Value>,
        options: GlobalOptions,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let patterns = validate_patterns(patterns)?;
        Self::from_patterns(patterns, options, fs)
    }

    /// Build an engine from already-typed patterns.
    pub fn from_patterns(
        patterns: Vec<Pattern>,
        options: GlobalOptions,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let compiled = patterns
            .into_iter()
            .enumerate()
            .map(|(index, pattern)| {
                validate_pattern(index, &pattern)?;
                let ignore = IgnoreSet::compile(options.ignore.iter().chain(pattern.ignore.iter()))?;
                Ok(CompiledPattern {
                    index,
                    pattern,
                    ignore,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(patterns = compiled.len(), "copy engine configured");

        Ok(Self {
            patterns: compiled,
            options,
            fs,
            staleness: StalenessTable::new(),
            contributed: Contributed::default(),
            phase: CyclePhase::Idle,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn staleness(&self) -> &StalenessTable {
        &self.staleness
    }

    /// Phase 1: resolve all patterns and write assets into `cycle`.
    pub fn run_pre_emit(&mut self, cycle: &mut BuildCycle) -> Result<CycleReport> {
        if self.phase == CyclePhase::PreEmitDone {
            warn!("previous cycle never reached post-emit; starting a new cycle anyway");
        }
        self.contributed = Contributed::default();
        self.staleness.begin_cycle();

        let mut pass = Pass {
            fs: self.fs.as_ref(),
            staleness: &mut self.staleness,
            contributed: &mut self.contributed,
            copy_unmodified: self.options.copy_unmodified,
            cycle,
            written: HashSet::new(),
            report: CycleReport::default(),
        };

        for compiled in &self.patterns {
            pass.process(compiled);
        }

        let report = pass.report;
        self.phase = CyclePhase::PreEmitDone;
        info!(%report, "pre-emit pass complete");
        Ok(report)
    }

    /// Phase 2: make sure every dependency contributed in phase 1 is present
    /// in the cycle's lists. Returns how many entries had to be restored.
    pub fn run_post_emit(&mut self, cycle: &mut BuildCycle) -> Result<usize> {
        if self.phase != CyclePhase::PreEmitDone {
            debug!("post-emit without a preceding pre-emit; nothing to reconcile");
            return Ok(0);
        }

        let contributed = std::mem::take(&mut self.contributed);
        let mut restored = 0;
        for path in contributed.files.iter() {
            if cycle.file_dependencies.push(path) {
                restored += 1;
            }
        }
        for path in contributed.contexts.iter() {
            if cycle.context_dependencies.push(path) {
                restored += 1;
            }
        }

        self.phase = CyclePhase::Idle;
        debug!(
            restored,
            file_dependencies = cycle.file_dependencies.len(),
            context_dependencies = cycle.context_dependencies.len(),
            "post-emit reconciliation complete"
        );
        Ok(restored)
    }
}

/// Mutable state of one phase-1 pass.
struct Pass<'a> {
    fs: &'a dyn FileSystem,
    staleness: &'a mut StalenessTable,
    contributed: &'a mut Contributed,
    copy_unmodified: bool,
    cycle: &'a mut BuildCycle,
    /// Keys written earlier in this pass; later patterns overwrite them
    /// regardless of `force`.
    written: HashSet<String>,
    report: CycleReport,
}

impl Pass<'_> {
    fn process(&mut self, compiled: &CompiledPattern) {
        let pattern = &compiled.pattern;
        let base = normalize(&self.cycle.context);
        let context = match &pattern.context {
            Some(ctx) => absolutize(&base, ctx),
            None => base,
        };

        let resolution = match resolve_from(self.fs, &pattern.from, &context, &compiled.ignore) {
            Ok(r) => r,
            Err(e) => {
                self.record_error(context.join(pattern.from.as_str()), e.to_string());
                return;
            }
        };

        for (dir, message) in &resolution.walk_errors {
            self.record_error(dir.clone(), message.clone());
        }

        match resolution.kind {
            FromKind::Dir => self.add_context_dependency(&resolution.root),
            FromKind::File | FromKind::Glob => {
                for file in &resolution.files {
                    self.add_file_dependency(&file.absolute);
                }
            }
        }

        if resolution.files.is_empty() {
            debug!(pattern = compiled.index, from = %pattern.from.as_str(), "pattern matched no files");
            return;
        }

        let output_root = normalize(&self.cycle.output_path);
        let to = pattern.to.as_deref();
        let existing_dir = pattern.to_type.is_none()
            && to.is_some_and(|t| !t.is_empty() && self.fs.is_dir(&absolutize(&output_root, Path::new(t))));
        let dest = Destination {
            to,
            to_type: infer_to_type(pattern.to_type, to, existing_dir),
            flatten: pattern.flatten,
            output_root: &output_root,
        };
        if dest.to_type == ToType::File && resolution.files.len() > 1 {
            debug!(
                pattern = compiled.index,
                matches = resolution.files.len(),
                "file destination matched several sources; the last one wins"
            );
        }

        // Literal single-file patterns always copy.
        let always_copy = self.copy_unmodified || resolution.kind == FromKind::File;

        for file in &resolution.files {
            self.report.matched += 1;

            let mtime = match self.fs.modified(&file.absolute) {
                Ok(m) => m,
                Err(e) => {
                    self.record_error(file.absolute.clone(), format!("{e:#}"));
                    continue;
                }
            };

            if !self.staleness.should_copy(&file.absolute, mtime, always_copy) {
                self.report.unchanged += 1;
                continue;
            }

            let content = match self.fs.read(&file.absolute) {
                Ok(c) => c,
                Err(e) => {
                    // Retry on the next cycle even if the mtime stays put.
                    self.staleness.invalidate(&file.absolute);
                    self.record_error(file.absolute.clone(), format!("{e:#}"));
                    continue;
                }
            };

            let key = map_destination(&dest, &file.relative, &content);
            self.write_asset(key, content, &file.absolute, pattern.force);
        }
    }

    fn write_asset(&mut self, key: String, content: Vec<u8>, source: &Path, force: bool) {
        let exists = self.cycle.assets.contains(&key);
        if exists && !force && !self.written.contains(&key) {
            debug!(%key, ?source, "asset already exists; skipping (force = false)");
            self.report.skipped_existing += 1;
            return;
        }

        debug!(%key, ?source, overwrite = exists, "writing asset");
        self.cycle
            .assets
            .insert(key.clone(), Asset::from_source(content, source));
        self.written.insert(key);
        self.report.copied += 1;
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.cycle.file_dependencies.push(path);
        self.contributed.files.push(path);
    }

    fn add_context_dependency(&mut self, path: &Path) {
        self.cycle.context_dependencies.push(path);
        self.contributed.contexts.push(path);
    }

    fn record_error(&mut self, path: PathBuf, message: String) {
        warn!(?path, %message, "copy failed");
        self.cycle.errors.push(CycleError::new(path, message));
        self.report.errors += 1;
    }
}
