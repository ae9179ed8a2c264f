// src/config/model.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the `to` of a pattern should be interpreted.
///
/// When a pattern leaves this unset, the path mapper infers it from the shape
/// of `to` (see [`crate::resolve::mapper::infer_to_type`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToType {
    /// `to` is a directory; matched files keep their relative path under it.
    Dir,
    /// `to` is the literal destination of a single file.
    File,
    /// `to` contains `[name]`, `[ext]`, `[path]` or `[hash]` tokens.
    Template,
}

/// One entry of an `ignore` list.
///
/// ```toml
/// ignore = ["*.tmp", { glob = "*.bak", dot = true }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IgnoreSpec {
    Glob(String),
    Record {
        glob: String,
        #[serde(default)]
        dot: bool,
    },
}

impl IgnoreSpec {
    pub fn glob(&self) -> &str {
        match self {
            IgnoreSpec::Glob(g) => g,
            IgnoreSpec::Record { glob, .. } => glob,
        }
    }

    /// Whether wildcards in this filter may match dot-prefixed names.
    pub fn dot(&self) -> bool {
        match self {
            IgnoreSpec::Glob(_) => false,
            IgnoreSpec::Record { dot, .. } => *dot,
        }
    }
}

impl From<&str> for IgnoreSpec {
    fn from(glob: &str) -> Self {
        IgnoreSpec::Glob(glob.to_string())
    }
}

/// The `from` of a pattern: a literal path / glob string, or a glob record
/// that opts into dotfile matching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FromSpec {
    Path(String),
    Glob {
        glob: String,
        #[serde(default)]
        dot: bool,
    },
}

impl FromSpec {
    pub fn as_str(&self) -> &str {
        match self {
            FromSpec::Path(p) => p,
            FromSpec::Glob { glob, .. } => glob,
        }
    }

    /// Whether glob wildcards may match dot-prefixed names.
    pub fn dot(&self) -> bool {
        match self {
            FromSpec::Path(_) => false,
            FromSpec::Glob { dot, .. } => *dot,
        }
    }
}

impl From<&str> for FromSpec {
    fn from(path: &str) -> Self {
        FromSpec::Path(path.to_string())
    }
}

/// One user-supplied copy rule.
///
/// Keys are accepted both in snake_case and in the camelCase spelling used
/// by JSON hosts (`toType`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pattern {
    pub from: FromSpec,

    #[serde(default)]
    pub to: Option<String>,

    /// Base directory for `from`; relative values resolve against the build
    /// context.
    #[serde(default)]
    pub context: Option<PathBuf>,

    #[serde(default, alias = "toType")]
    pub to_type: Option<ToType>,

    #[serde(default)]
    pub flatten: bool,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub ignore: Vec<IgnoreSpec>,
}

impl Pattern {
    /// A pattern with only `from` set.
    pub fn from_path(from: impl Into<String>) -> Self {
        Self {
            from: FromSpec::Path(from.into()),
            to: None,
            context: None,
            to_type: None,
            flatten: false,
            force: false,
            ignore: Vec::new(),
        }
    }
}

/// Engine-wide options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlobalOptions {
    /// Filters applied to every pattern before the pattern's own `ignore`.
    #[serde(default)]
    pub ignore: Vec<IgnoreSpec>,

    /// Disable unmodified-file skipping for directory and glob patterns.
    #[serde(default, alias = "copyUnmodified")]
    pub copy_unmodified: bool,
}

/// Top-level CLI configuration as read from a TOML file.
///
/// ```toml
/// [options]
/// context = "."
/// output = "dist"
/// ignore = ["*.tmp"]
///
/// [[patterns]]
/// from = "static"
/// to = "assets"
/// ```
///
/// `patterns` is kept untyped until validation so that shape errors are
/// reported as configuration errors rather than TOML errors.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub options: OptionsSection,

    #[serde(default)]
    pub patterns: Option<serde_json::Value>,
}

/// `[options]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsSection {
    /// Build root context; relative to the config file's directory.
    #[serde(default = "default_context")]
    pub context: PathBuf,

    /// Output root; relative to the config file's directory.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(flatten)]
    pub global: GlobalOptions,
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            context: default_context(),
            output: default_output(),
            global: GlobalOptions::default(),
        }
    }
}

/// Validated configuration.
///
/// The only way to obtain one is through `TryFrom<RawConfigFile>` (see
/// `config::validate`), which guarantees `patterns` is well formed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    options: OptionsSection,
    patterns: Vec<Pattern>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(options: OptionsSection, patterns: Vec<Pattern>) -> Self {
        Self { options, patterns }
    }

    pub fn options(&self) -> &OptionsSection {
        &self.options
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Rebase relative `context` / `output` onto `dir`.
    pub fn rebase(mut self, dir: &std::path::Path) -> Self {
        if self.options.context.is_relative() {
            self.options.context = dir.join(&self.options.context);
        }
        if self.options.output.is_relative() {
            self.options.output = dir.join(&self.options.output);
        }
        self
    }
}
