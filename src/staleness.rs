// src/staleness.rs

//! Change detection by modification time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Last-seen modification time (whole seconds) per absolute source path.
///
/// Lives as long as the [`crate::engine::CopyEngine`] that owns it; nothing is
/// persisted, so a new process starts with every file "changed".
///
/// Within one cycle every pattern gets the same verdict for a path: the first
/// sighting compares against the previous cycle and the answer is reused
/// until [`StalenessTable::begin_cycle`] is called again.
#[derive(Debug, Default)]
pub struct StalenessTable {
    seen: HashMap<PathBuf, i64>,
    verdicts: HashMap<PathBuf, bool>,
}

impl StalenessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget this cycle's verdicts. Recorded mtimes are kept.
    pub fn begin_cycle(&mut self) {
        self.verdicts.clear();
    }

    /// Decide whether `path` should be copied and record `mtime` for it.
    ///
    /// Returns true when the path was never seen before this cycle, its mtime
    /// differs from the one recorded by an earlier cycle, or `always_copy` is
    /// set. The mtime is recorded in every case, so the next cycle compares
    /// against this one.
    pub fn should_copy(&mut self, path: &Path, mtime: SystemTime, always_copy: bool) -> bool {
        let secs = mtime_secs(mtime);
        let previous = self.seen.insert(path.to_path_buf(), secs);

        let changed = match self.verdicts.get(path) {
            Some(&changed) => changed,
            None => {
                let changed = previous != Some(secs);
                self.verdicts.insert(path.to_path_buf(), changed);
                changed
            }
        };
        if !changed {
            debug!(?path, mtime = secs, "source unchanged since last cycle");
        }
        changed || always_copy
    }

    /// Recorded mtime for `path`, if any.
    pub fn last_seen(&self, path: &Path) -> Option<i64> {
        self.seen.get(path).copied()
    }

    /// Forget a path, so its next sighting counts as changed.
    pub fn invalidate(&mut self, path: &Path) {
        self.verdicts.remove(path);
        if self.seen.remove(path).is_some() {
            debug!(?path, "invalidated staleness entry");
        }
    }
}

/// Seconds since the Unix epoch; sub-second precision is discarded.
pub fn mtime_secs(mtime: SystemTime) -> i64 {
    match mtime.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs_f64().ceil() as i64),
    }
}
