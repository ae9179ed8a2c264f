// src/resolve/mod.rs

//! Pattern resolution: from `from` to concrete files, and from files to
//! destination keys.
//!
//! Nothing here mutates build state; the orchestrator in [`crate::engine`]
//! decides what to do with the results.

pub mod glob;
pub mod ignore;
pub mod mapper;
pub mod path_utils;

pub use glob::{resolve_from, FromKind, MatchedFile, Resolution};
pub use ignore::{IgnoreFilter, IgnoreSet};
pub use mapper::{infer_to_type, map_destination, Destination};
