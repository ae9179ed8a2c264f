#![allow(dead_code)]

use std::path::PathBuf;

use assetcopy::config::{FromSpec, GlobalOptions, IgnoreSpec, Pattern, ToType};

/// Builder for `Pattern` to simplify test setup.
pub struct PatternBuilder {
    pattern: Pattern,
}

impl PatternBuilder {
    pub fn new(from: &str) -> Self {
        Self {
            pattern: Pattern::from_path(from),
        }
    }

    /// `from` as a `{ glob, dot }` record.
    pub fn glob(glob: &str, dot: bool) -> Self {
        let mut pattern = Pattern::from_path(glob);
        pattern.from = FromSpec::Glob {
            glob: glob.to_string(),
            dot,
        };
        Self { pattern }
    }

    pub fn to(mut self, to: &str) -> Self {
        self.pattern.to = Some(to.to_string());
        self
    }

    pub fn context(mut self, context: &str) -> Self {
        self.pattern.context = Some(PathBuf::from(context));
        self
    }

    pub fn to_type(mut self, to_type: ToType) -> Self {
        self.pattern.to_type = Some(to_type);
        self
    }

    pub fn flatten(mut self, val: bool) -> Self {
        self.pattern.flatten = val;
        self
    }

    pub fn force(mut self, val: bool) -> Self {
        self.pattern.force = val;
        self
    }

    pub fn ignore(mut self, glob: &str) -> Self {
        self.pattern.ignore.push(IgnoreSpec::Glob(glob.to_string()));
        self
    }

    pub fn ignore_dot(mut self, glob: &str) -> Self {
        self.pattern.ignore.push(IgnoreSpec::Record {
            glob: glob.to_string(),
            dot: true,
        });
        self
    }

    pub fn build(self) -> Pattern {
        self.pattern
    }
}

/// Builder for `GlobalOptions`.
#[derive(Default)]
pub struct OptionsBuilder {
    options: GlobalOptions,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, glob: &str) -> Self {
        self.options.ignore.push(IgnoreSpec::Glob(glob.to_string()));
        self
    }

    pub fn copy_unmodified(mut self, val: bool) -> Self {
        self.options.copy_unmodified = val;
        self
    }

    pub fn build(self) -> GlobalOptions {
        self.options
    }
}
