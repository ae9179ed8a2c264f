// src/resolve/glob.rs

//! Expansion of a pattern's `from` into concrete source files.

use std::collections::{BTreeSet, HashSet};
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::config::model::FromSpec;
use crate::errors::{AssetCopyError, Result};
use crate::fs::FileSystem;
use crate::resolve::ignore::IgnoreSet;
use crate::resolve::path_utils::{absolutize, has_dot_segment, normalize, relative_to, to_slash};

/// What `from` turned out to be on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FromKind {
    /// An existing file; always copied regardless of staleness.
    File,
    /// An existing directory; every file beneath it is matched.
    Dir,
    /// Anything else, expanded as a glob expression.
    Glob,
}

/// A source file that survived ignore filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub absolute: PathBuf,
    /// Path relative to the matched root, slash-separated. May start with
    /// `../` for globs that reach outside their context.
    pub relative: String,
}

/// Result of resolving one pattern's `from`.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub kind: FromKind,
    /// Directory `relative` paths are computed against.
    pub root: PathBuf,
    /// Sorted by absolute path, no duplicates.
    pub files: Vec<MatchedFile>,
    /// Directories that could not be listed; the walk continues past them.
    pub walk_errors: Vec<(PathBuf, String)>,
}

/// Characters that make a `from` segment a glob rather than a literal name.
const GLOB_META: &[char] = &['*', '?', '[', '{'];

pub fn is_glob(s: &str) -> bool {
    s.contains(GLOB_META)
}

/// Compile a glob where `*` and `?` never cross a `/`.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| AssetCopyError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        })
}

/// Resolve `from` against `context` and apply `ignore`.
///
/// Ignore filters always see the path relative to `context`, whatever the
/// matched root turns out to be.
///
/// Returns `Err` only for an invalid glob expression. A `from` that matches
/// nothing yields an empty resolution.
pub fn resolve_from(
    fs: &dyn FileSystem,
    from: &FromSpec,
    context: &Path,
    ignore: &IgnoreSet,
) -> Result<Resolution> {
    let absolute_from = absolutize(context, Path::new(from.as_str()));

    let mut resolution = if fs.is_dir(&absolute_from) {
        resolve_dir(fs, &absolute_from)
    } else if fs.is_file(&absolute_from) {
        resolve_file(&absolute_from)
    } else {
        resolve_glob(fs, from.as_str(), context, from.dot())?
    };

    if !ignore.is_empty() {
        let before = resolution.files.len();
        resolution
            .files
            .retain(|f| !ignore.is_ignored(&to_slash(&relative_to(context, &f.absolute))));
        let dropped = before - resolution.files.len();
        if dropped > 0 {
            debug!(from = %from.as_str(), dropped, "ignore filters removed matches");
        }
    }

    Ok(resolution)
}

fn resolve_file(absolute_from: &Path) -> Resolution {
    let root = absolute_from
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));
    let relative = absolute_from
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Resolution {
        kind: FromKind::File,
        root,
        files: vec![MatchedFile {
            absolute: absolute_from.to_path_buf(),
            relative,
        }],
        walk_errors: Vec::new(),
    }
}

fn resolve_dir(fs: &dyn FileSystem, dir: &Path) -> Resolution {
    let mut walk_errors = Vec::new();
    let found = walk_files(fs, dir, None, &mut walk_errors);

    let files = found
        .into_iter()
        .map(|absolute| MatchedFile {
            relative: to_slash(&relative_to(dir, &absolute)),
            absolute,
        })
        .collect();

    Resolution {
        kind: FromKind::Dir,
        root: dir.to_path_buf(),
        files,
        walk_errors,
    }
}

fn resolve_glob(
    fs: &dyn FileSystem,
    from: &str,
    context: &Path,
    dot: bool,
) -> Result<Resolution> {
    let (base, remainder) = split_glob_base(context, from);
    let mut resolution = Resolution {
        kind: FromKind::Glob,
        root: context.to_path_buf(),
        files: Vec::new(),
        walk_errors: Vec::new(),
    };

    // A literal path that does not exist: nothing to expand.
    if !is_glob(&remainder) || !fs.is_dir(&base) {
        return Ok(resolution);
    }

    // Only the wildcard part is compiled; the literal base may contain glob
    // metacharacters of its own.
    let matcher = compile_glob(&remainder)?;
    let explicit_dot = has_dot_segment(&remainder);
    let max_depth = if remainder.contains("**") {
        None
    } else {
        Some(remainder.split('/').count())
    };

    let found = walk_files(fs, &base, max_depth, &mut resolution.walk_errors);
    resolution.files = found
        .into_iter()
        .filter(|path| {
            let below_base = to_slash(&relative_to(&base, path));
            matcher.is_match(&below_base)
                && (dot || explicit_dot || !has_dot_segment(&below_base))
        })
        .map(|absolute| MatchedFile {
            relative: to_slash(&relative_to(context, &absolute)),
            absolute,
        })
        .collect();

    Ok(resolution)
}

/// Split `from` into an absolute literal directory (resolved against
/// `context` when `from` is relative) and the slash-separated remainder that
/// contains the wildcards.
fn split_glob_base(context: &Path, from: &str) -> (PathBuf, String) {
    let from = normalize(Path::new(from));
    let mut base = if from.is_absolute() {
        PathBuf::new()
    } else {
        context.to_path_buf()
    };
    let mut rest: Vec<String> = Vec::new();

    for comp in from.components() {
        let s = comp.as_os_str().to_string_lossy();
        let literal = rest.is_empty() && (!matches!(comp, Component::Normal(_)) || !is_glob(&s));
        if literal {
            base.push(comp.as_os_str());
        } else {
            rest.push(s.into_owned());
        }
    }

    let mut base = normalize(&base);

    // A fully literal pattern: the last segment is the "remainder".
    if rest.is_empty() {
        if let Some(name) = base.file_name().map(|n| n.to_string_lossy().into_owned()) {
            base.pop();
            rest.push(name);
        }
    }

    (base, rest.join("/"))
}

/// Recursively list files under `root`, sorted and deduplicated.
///
/// `max_depth` counts path segments below `root` (1 = direct children).
/// Each directory is entered at most once by canonical path, so symlinks
/// pointing back at an ancestor do not loop.
fn walk_files(
    fs: &dyn FileSystem,
    root: &Path,
    max_depth: Option<usize>,
    errors: &mut Vec<(PathBuf, String)>,
) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = stack.pop() {
        let canonical = fs.canonicalize(&dir).unwrap_or_else(|_| dir.clone());
        if !visited.insert(canonical) {
            debug!(?dir, "directory already walked; skipping");
            continue;
        }

        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                errors.push((dir, format!("{e:#}")));
                continue;
            }
        };

        for path in entries {
            if fs.is_dir(&path) {
                if max_depth.is_none_or(|max| depth + 1 < max) {
                    stack.push((path, depth + 1));
                }
            } else if fs.is_file(&path) {
                files.insert(path);
            }
        }
    }

    files.into_iter().collect()
}
