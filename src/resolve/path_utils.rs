// src/resolve/path_utils.rs

//! Lexical path helpers.
//!
//! None of these touch the filesystem: symlinks are not resolved, which keeps
//! destination keys deterministic for identical inputs.

use std::path::{Component, Path, PathBuf};

/// Normalise `path` lexically: drop `.` segments and fold `..` into the
/// preceding normal segment.
///
/// Leading `..` segments of a relative path are kept; on an absolute path they
/// are dropped (`/..` is `/`).
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}

/// Lexical path from `base` to `target`, e.g. `/a/b` → `/a/c/d` is `../c/d`.
///
/// Both inputs are normalised first. Returns an empty path when they are equal.
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base = normalize(base);
    let target = normalize(target);

    let base_comps: Vec<_> = base.components().collect();
    let target_comps: Vec<_> = target.components().collect();

    let common = base_comps
        .iter()
        .zip(target_comps.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_comps.len() {
        rel.push("..");
    }
    for comp in &target_comps[common..] {
        rel.push(comp.as_os_str());
    }
    rel
}

/// Render a path with forward slashes, as used for asset keys.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// True if any segment of the (relative, slash-separated) path starts with `.`.
pub fn has_dot_segment(rel: &str) -> bool {
    rel.split('/')
        .any(|seg| seg.starts_with('.') && seg != "." && seg != "..")
}
