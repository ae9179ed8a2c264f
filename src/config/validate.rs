// src/config/validate.rs

use serde_json::Value;

use crate::config::model::{ConfigFile, Pattern, RawConfigFile, ToType};
use crate::errors::{AssetCopyError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::AssetCopyError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let patterns = validate_patterns(raw.patterns.as_ref())?;
        Ok(ConfigFile::new_unchecked(raw.options, patterns))
    }
}

/// Validate the untyped `patterns` argument and turn it into typed patterns.
///
/// - absent → no patterns (the engine becomes a no-op)
/// - an array → every entry must be a pattern table or a `from` string
/// - anything else (including `null`) → [`AssetCopyError::ConfigError`]
pub fn validate_patterns(raw: Option<&Value>) -> Result<Vec<Pattern>> {
    let items = match raw {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AssetCopyError::ConfigError(format!(
                "`patterns` must be an array of pattern objects (got {})",
                value_kind(other)
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_pattern(idx, item))
        .collect()
}

fn parse_pattern(idx: usize, item: &Value) -> Result<Pattern> {
    let pattern = match item {
        Value::String(from) => Pattern::from_path(from.clone()),
        Value::Object(_) => serde_json::from_value::<Pattern>(item.clone()).map_err(|e| {
            AssetCopyError::ConfigError(format!("patterns[{idx}] is not a valid pattern: {e}"))
        })?,
        other => {
            return Err(AssetCopyError::ConfigError(format!(
                "patterns[{idx}] must be an object or a string (got {})",
                value_kind(other)
            )));
        }
    };

    validate_pattern(idx, &pattern)?;
    Ok(pattern)
}

pub(crate) fn validate_pattern(idx: usize, pattern: &Pattern) -> Result<()> {
    if pattern.from.as_str().trim().is_empty() {
        return Err(AssetCopyError::ConfigError(format!(
            "patterns[{idx}].from must not be empty"
        )));
    }

    if pattern.to_type == Some(ToType::Template) && pattern.to.as_deref().unwrap_or("").is_empty() {
        return Err(AssetCopyError::ConfigError(format!(
            "patterns[{idx}] has toType = \"template\" but no `to`"
        )));
    }

    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
