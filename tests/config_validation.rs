// tests/config_validation.rs

use std::error::Error;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use assetcopy::config::{load_and_validate, validate_patterns, FromSpec, GlobalOptions, ToType};
use assetcopy::engine::CopyEngine;
use assetcopy::errors::AssetCopyError;
use assetcopy::fs::FileSystem;
use assetcopy::fs::mock::MockFileSystem;
use assetcopy_test_utils::builders::{OptionsBuilder, PatternBuilder};
use assetcopy_test_utils::fixtures::{project_fs, run_cycle};
use assetcopy_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn mock_engine(patterns: Option<&serde_json::Value>) -> assetcopy::errors::Result<CopyEngine> {
    let fs: Arc<dyn FileSystem> = Arc::new(project_fs());
    CopyEngine::new(patterns, GlobalOptions::default(), fs)
}

#[test]
fn absent_patterns_produce_nothing() -> TestResult {
    init_tracing();

    let mut engine = mock_engine(None)?;
    assert_eq!(engine.pattern_count(), 0);

    let cycle = run_cycle(&mut engine);
    assert!(cycle.assets.is_empty());
    assert!(cycle.file_dependencies.is_empty());
    assert!(cycle.context_dependencies.is_empty());
    assert!(!cycle.has_errors());
    Ok(())
}

#[test]
fn empty_pattern_array_produces_nothing() -> TestResult {
    init_tracing();

    let value = json!([]);
    let mut engine = mock_engine(Some(&value))?;
    let cycle = run_cycle(&mut engine);
    assert!(cycle.assets.is_empty());
    assert!(cycle.file_dependencies.is_empty());
    Ok(())
}

#[test]
fn null_patterns_are_a_config_error() {
    let value = serde_json::Value::Null;
    match mock_engine(Some(&value)) {
        Err(AssetCopyError::ConfigError(msg)) => {
            assert!(msg.contains("must be an array"), "unexpected message: {msg}");
            assert!(msg.contains("null"));
        }
        Err(e) => panic!("Expected ConfigError, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn object_patterns_are_a_config_error() {
    let value = json!({ "from": "file.txt" });
    match validate_patterns(Some(&value)) {
        Err(AssetCopyError::ConfigError(msg)) => assert!(msg.contains("an object")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn string_entries_are_shorthand_for_from() -> TestResult {
    let value = json!(["file.txt", { "from": "directory", "to": "out", "toType": "dir" }]);
    let patterns = validate_patterns(Some(&value))?;

    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].from, FromSpec::Path("file.txt".to_string()));
    assert_eq!(patterns[0].to, None);
    assert_eq!(patterns[1].to.as_deref(), Some("out"));
    assert_eq!(patterns[1].to_type, Some(ToType::Dir));
    Ok(())
}

#[test]
fn glob_record_and_ignore_records_deserialize() -> TestResult {
    let value = json!([{
        "from": { "glob": "directory/*", "dot": true },
        "ignore": ["*.txt", { "glob": ".cache/**", "dot": true }],
        "flatten": true,
        "force": true
    }]);
    let patterns = validate_patterns(Some(&value))?;

    let p = &patterns[0];
    assert_eq!(p.from.as_str(), "directory/*");
    assert!(p.from.dot());
    assert!(p.flatten);
    assert!(p.force);
    assert_eq!(p.ignore.len(), 2);
    assert!(!p.ignore[0].dot());
    assert!(p.ignore[1].dot());
    Ok(())
}

#[test]
fn non_object_entry_is_rejected_with_its_index() {
    let value = json!(["file.txt", 42]);
    match validate_patterns(Some(&value)) {
        Err(AssetCopyError::ConfigError(msg)) => {
            assert!(msg.contains("patterns[1]"));
            assert!(msg.contains("a number"));
        }
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn empty_from_is_rejected() {
    let value = json!([{ "from": "  " }]);
    assert!(matches!(
        validate_patterns(Some(&value)),
        Err(AssetCopyError::ConfigError(msg)) if msg.contains("from must not be empty")
    ));
}

#[test]
fn template_without_to_is_rejected() {
    let value = json!([{ "from": "file.txt", "toType": "template" }]);
    assert!(matches!(
        validate_patterns(Some(&value)),
        Err(AssetCopyError::ConfigError(msg)) if msg.contains("template")
    ));
}

#[test]
fn invalid_ignore_glob_fails_at_construction() {
    let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());

    let own = CopyEngine::from_patterns(
        vec![PatternBuilder::new("file.txt").ignore("a[").build()],
        GlobalOptions::default(),
        Arc::clone(&fs),
    );
    assert!(matches!(own, Err(AssetCopyError::InvalidGlob { pattern, .. }) if pattern == "a["));

    let global = CopyEngine::from_patterns(
        vec![PatternBuilder::new("file.txt").build()],
        OptionsBuilder::new().ignore("{unclosed").build(),
        fs,
    );
    assert!(matches!(global, Err(AssetCopyError::InvalidGlob { .. })));
}

#[test]
fn toml_config_is_loaded_and_rebased() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assetcopy.toml");
    std::fs::write(
        &path,
        r#"
[options]
output = "public"
ignore = ["*.tmp"]
copy_unmodified = true

[[patterns]]
from = "static"
to = "assets"

[[patterns]]
from = "robots.txt"
toType = "file"
to = "robots.txt"
"#,
    )?;

    let cfg = load_and_validate(&path)?;
    let options = cfg.options();

    assert_eq!(options.output, dir.path().join("public"));
    assert!(options.context.starts_with(dir.path()));
    assert!(options.global.copy_unmodified);
    assert_eq!(options.global.ignore.len(), 1);

    let patterns = cfg.patterns();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].from.as_str(), "static");
    assert_eq!(patterns[0].to.as_deref(), Some("assets"));
    assert_eq!(patterns[1].to_type, Some(ToType::File));
    Ok(())
}

#[test]
fn toml_without_patterns_is_valid() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assetcopy.toml");
    std::fs::write(&path, "[options]\noutput = \"dist\"\n")?;

    let cfg = load_and_validate(&path)?;
    assert!(cfg.patterns().is_empty());
    Ok(())
}

#[test]
fn toml_with_non_array_patterns_is_a_config_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assetcopy.toml");
    std::fs::write(&path, "patterns = \"static\"\n")?;

    match load_and_validate(&path) {
        Err(AssetCopyError::ConfigError(msg)) => assert!(msg.contains("a string")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assetcopy.toml");
    std::fs::write(&path, "[options\n")?;

    assert!(matches!(load_and_validate(&path), Err(AssetCopyError::TomlError(_))));
    Ok(())
}
