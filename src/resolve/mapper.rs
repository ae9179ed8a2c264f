// src/resolve/mapper.rs

//! Destination keys for matched files.
//!
//! A key is a slash-separated path relative to the output root. Keys may
//! start with `../` when a source or an absolute `to` lies outside the output
//! root; hosts decide what to do with those.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::model::ToType;
use crate::resolve::path_utils::{normalize, relative_to, to_slash};

static TEMPLATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(name|ext|path|hash)(?::(\d+))?\]").expect("template token regex is valid")
});

/// Per-pattern destination settings, with `to_type` already decided.
#[derive(Debug, Clone, Copy)]
pub struct Destination<'a> {
    pub to: Option<&'a str>,
    pub to_type: ToType,
    pub flatten: bool,
    pub output_root: &'a Path,
}

/// Decide the destination shape for a pattern.
///
/// An explicit `toType` always wins. Otherwise the shape of `to` is used:
///
/// - no `to`, or a trailing separator → directory
/// - a `[token]` → template
/// - no extension → directory
/// - an extension, but `existing_dir` says the output already has a
///   directory by that name → directory
/// - otherwise → file
///
/// The extension rule is a heuristic: `to = "newdirectory.ext"` is treated as
/// a file unless `toType = "dir"` or a trailing `/` says otherwise.
pub fn infer_to_type(explicit: Option<ToType>, to: Option<&str>, existing_dir: bool) -> ToType {
    if let Some(to_type) = explicit {
        return to_type;
    }

    let Some(to) = to.filter(|t| !t.is_empty()) else {
        return ToType::Dir;
    };

    if to.ends_with('/') || to.ends_with('\\') {
        ToType::Dir
    } else if is_template(to) {
        ToType::Template
    } else if Path::new(to).extension().is_none() || existing_dir {
        ToType::Dir
    } else {
        ToType::File
    }
}

pub fn is_template(to: &str) -> bool {
    TEMPLATE_TOKEN.is_match(to)
}

/// Compute the asset key for one matched file.
///
/// `relative` is the file's path relative to its matched root. With
/// `flatten` only its base name is used, `[path]` included. `content` is only
/// consulted for `[hash]` templates.
pub fn map_destination(dest: &Destination<'_>, relative: &str, content: &[u8]) -> String {
    let rel = if dest.flatten {
        base_name(relative)
    } else {
        relative
    };
    let to = dest.to.filter(|t| !t.is_empty());

    let key: PathBuf = match (dest.to_type, to) {
        (ToType::Dir, Some(to)) => relativize(to, dest.output_root).join(rel),
        (ToType::Dir, None) | (ToType::File, None) | (ToType::Template, None) => {
            PathBuf::from(rel)
        }
        (ToType::File, Some(to)) => relativize(to, dest.output_root),
        (ToType::Template, Some(to)) => {
            relativize(&interpolate(to, rel, content), dest.output_root)
        }
    };

    to_slash(&normalize(&key))
}

/// Express an absolute `to` relative to the output root.
fn relativize(to: &str, output_root: &Path) -> PathBuf {
    let path = Path::new(to);
    if path.is_absolute() {
        relative_to(output_root, path)
    } else {
        path.to_path_buf()
    }
}

fn base_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

/// Replace `[name]`, `[ext]`, `[path]` and `[hash]`/`[hash:N]` in `template`.
pub fn interpolate(template: &str, relative: &str, content: &[u8]) -> String {
    let file_name = base_name(relative);
    let (name, ext) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx + 1..]),
        _ => (file_name, ""),
    };
    let dir = match relative.rfind('/') {
        Some(idx) => &relative[..=idx],
        None => "",
    };

    TEMPLATE_TOKEN
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "name" => name.to_string(),
            "ext" => ext.to_string(),
            "path" => dir.to_string(),
            _ => {
                let digest = blake3::hash(content).to_hex().to_string();
                match caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok()) {
                    Some(len) if len < digest.len() => digest[..len].to_string(),
                    _ => digest,
                }
            }
        })
        .into_owned()
}
