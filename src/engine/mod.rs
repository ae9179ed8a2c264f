// src/engine/mod.rs

//! Copy orchestration.
//!
//! - [`core`](self::core): the synchronous [`CopyEngine`] with its two per-cycle phases.
//! - [`cycle`]: the host-owned state a cycle mutates.
//! - [`report`]: counters returned from phase 1.
//! - [`runtime`]: an async shell that runs cycles one after another in
//!   response to channel events.

pub mod core;
pub mod cycle;
pub mod report;
pub mod runtime;

pub use self::core::CopyEngine;
pub use cycle::{Asset, AssetSet, BuildCycle, CycleError, DependencyList};
pub use report::CycleReport;
pub use runtime::{CycleHost, CycleRunner, RunSummary, RunnerEvent};
