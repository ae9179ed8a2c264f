// src/engine/cycle.rs

//! Host-owned state for one build cycle.
//!
//! A [`BuildCycle`] is what the engine mutates: the output asset set, the two
//! dependency lists and the error list. Hosts create a fresh one per cycle (or
//! reuse one and clear what they own).

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One output asset: raw bytes plus where they came from.
#[derive(Clone)]
pub struct Asset {
    content: Vec<u8>,
    source: Option<PathBuf>,
    digest: OnceLock<String>,
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("size", &self.content.len())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Asset {
    /// An asset produced by copying `source`.
    pub fn from_source(content: Vec<u8>, source: impl Into<PathBuf>) -> Self {
        Self {
            content,
            source: Some(source.into()),
            digest: OnceLock::new(),
        }
    }

    /// An asset registered by the host (or another plugin), with no source file.
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            source: None,
            digest: OnceLock::new(),
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// blake3 hex digest of the content, computed once.
    pub fn digest(&self) -> &str {
        self.digest
            .get_or_init(|| blake3::hash(&self.content).to_hex().to_string())
    }
}

/// Output asset set: destination key → asset, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct AssetSet {
    assets: BTreeMap<String, Asset>,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.assets.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Asset> {
        self.assets.get(key)
    }

    /// Insert or replace; returns the previous asset under `key`.
    pub fn insert(&mut self, key: impl Into<String>, asset: Asset) -> Option<Asset> {
        self.assets.insert(key.into(), asset)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Asset)> {
        self.assets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Insertion-ordered set of absolute paths.
#[derive(Debug, Clone, Default)]
pub struct DependencyList {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl DependencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless already present. Returns true if it was added.
    pub fn push(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.order.push(path);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.order.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

/// A per-file failure recorded during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub path: PathBuf,
    pub message: String,
}

impl CycleError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Everything the engine reads from and writes to during one cycle.
#[derive(Debug, Clone)]
pub struct BuildCycle {
    /// Build root; relative pattern contexts resolve against it.
    pub context: PathBuf,
    /// Output root; absolute `to` values are expressed relative to it.
    pub output_path: PathBuf,
    pub assets: AssetSet,
    pub file_dependencies: DependencyList,
    pub context_dependencies: DependencyList,
    pub errors: Vec<CycleError>,
}

impl BuildCycle {
    pub fn new(context: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            output_path: output_path.into(),
            assets: AssetSet::new(),
            file_dependencies: DependencyList::new(),
            context_dependencies: DependencyList::new(),
            errors: Vec::new(),
        }
    }

    /// A cycle that ended with errors is reported as failed by the host.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
