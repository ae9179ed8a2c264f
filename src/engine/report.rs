// src/engine/report.rs

//! Per-cycle counters returned by `CopyEngine::run_pre_emit`.

use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Files that survived glob expansion and ignore filtering.
    pub matched: u64,
    /// Assets written (inserted or overwritten).
    pub copied: u64,
    /// Files skipped because their mtime did not change.
    pub unchanged: u64,
    /// Files skipped because an unforced pre-existing asset held the key.
    pub skipped_existing: u64,
    /// Errors appended to the cycle during this pass.
    pub errors: u64,
}

impl CycleReport {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} matched={} copied={} unchanged={} skipped_existing={} errors={}",
            self.matched, self.copied, self.unchanged, self.skipped_existing, self.errors
        )
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[copy]"))
    }
}
