// src/resolve/ignore.rs

//! Ignore filters.
//!
//! Filters are matched against the file's path relative to the pattern
//! context, with two rules borrowed from the usual shell-glob conventions:
//!
//! - a filter without `/` is matched against the base name only, at any depth;
//! - wildcards do not match dot-prefixed segments unless the filter was given
//!   with `dot = true` (or spells the dot out, e.g. `.cache/**`).

use std::fmt;

use globset::GlobMatcher;

use crate::config::model::IgnoreSpec;
use crate::errors::Result;
use crate::resolve::glob::compile_glob;
use crate::resolve::path_utils::has_dot_segment;

/// One compiled ignore filter.
#[derive(Clone)]
pub struct IgnoreFilter {
    source: String,
    matcher: GlobMatcher,
    dot: bool,
    match_base: bool,
    explicit_dot: bool,
}

impl fmt::Debug for IgnoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreFilter")
            .field("glob", &self.source)
            .field("dot", &self.dot)
            .finish_non_exhaustive()
    }
}

impl IgnoreFilter {
    pub fn compile(spec: &IgnoreSpec) -> Result<Self> {
        let source = spec.glob().to_string();
        let matcher = compile_glob(&source)?;
        Ok(Self {
            match_base: !source.contains('/'),
            explicit_dot: has_dot_segment(&source),
            dot: spec.dot(),
            matcher,
            source,
        })
    }

    /// `rel` is slash-separated and relative to the pattern context.
    pub fn is_match(&self, rel: &str) -> bool {
        let candidate = if self.match_base {
            rel.rsplit('/').next().unwrap_or(rel)
        } else {
            rel
        };

        if !self.dot && !self.explicit_dot && has_dot_segment(candidate) {
            return false;
        }

        self.matcher.is_match(candidate)
    }
}

/// The merged ignore list for one pattern (global filters first).
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    filters: Vec<IgnoreFilter>,
}

impl IgnoreSet {
    pub fn compile<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a IgnoreSpec>,
    {
        let filters = specs
            .into_iter()
            .map(IgnoreFilter::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { filters })
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True if any filter matches `rel`.
    pub fn is_ignored(&self, rel: &str) -> bool {
        self.filters.iter().any(|f| f.is_match(rel))
    }
}
