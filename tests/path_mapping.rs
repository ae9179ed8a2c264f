// tests/path_mapping.rs

use std::error::Error;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use assetcopy::config::{GlobalOptions, ToType};
use assetcopy::resolve::mapper::{infer_to_type, interpolate, map_destination, Destination};
use assetcopy::resolve::path_utils::{normalize, relative_to};
use assetcopy_test_utils::builders::PatternBuilder;
use assetcopy_test_utils::fixtures::{content, engine, keys, project_fs, run_cycle};

type TestResult = Result<(), Box<dyn Error>>;

fn keys_for(pattern: assetcopy::config::Pattern) -> Vec<String> {
    let fs = project_fs();
    let mut engine = engine(&fs, vec![pattern], GlobalOptions::default());
    keys(&run_cycle(&mut engine))
}

#[test]
fn to_without_extension_is_a_directory() {
    assert_eq!(
        keys_for(PatternBuilder::new("file.txt").to("newdirectory").build()),
        vec!["newdirectory/file.txt"]
    );
}

#[test]
fn to_with_extension_renames_the_file() -> TestResult {
    let fs = project_fs();
    let mut engine = engine(
        &fs,
        vec![PatternBuilder::new("file.txt").to("newname.txt").build()],
        GlobalOptions::default(),
    );
    let cycle = run_cycle(&mut engine);
    assert_eq!(keys(&cycle), vec!["newname.txt"]);
    assert_eq!(content(&cycle, "newname.txt").as_deref(), Some("new"));
    Ok(())
}

#[test]
fn explicit_dir_type_overrides_the_extension_heuristic() {
    assert_eq!(
        keys_for(
            PatternBuilder::new("file.txt")
                .to("newdirectory.ext")
                .to_type(ToType::Dir)
                .build()
        ),
        vec!["newdirectory.ext/file.txt"]
    );
}

#[test]
fn trailing_separator_means_directory() {
    assert_eq!(
        keys_for(PatternBuilder::new("directory").to("newdirectory.ext/").build()),
        vec![
            "newdirectory.ext/.dottedfile",
            "newdirectory.ext/directoryfile.txt",
            "newdirectory.ext/nested/deep/deepnested.txt",
            "newdirectory.ext/nested/nestedfile.txt",
        ]
    );
}

#[test]
fn existing_output_directory_is_treated_as_a_directory() {
    let fs = project_fs();
    fs.add_dir("/project/build/assets.v1");
    let mut engine = engine(
        &fs,
        vec![PatternBuilder::new("file.txt").to("assets.v1").build()],
        GlobalOptions::default(),
    );
    assert_eq!(keys(&run_cycle(&mut engine)), vec!["assets.v1/file.txt"]);
}

#[test]
fn absolute_to_is_relative_to_the_output_root() {
    assert_eq!(
        keys_for(PatternBuilder::new("file.txt").to("/project/build/abs").build()),
        vec!["abs/file.txt"]
    );
    assert_eq!(
        keys_for(PatternBuilder::new("file.txt").to("/project/outside").build()),
        vec!["../outside/file.txt"]
    );
}

#[test]
fn parent_segments_are_kept_in_keys() {
    assert_eq!(
        keys_for(PatternBuilder::new("file.txt").to("../upper").build()),
        vec!["../upper/file.txt"]
    );
    assert_eq!(
        keys_for(PatternBuilder::new("file.txt").to("./a/../b/./c").build()),
        vec!["b/c/file.txt"]
    );
}

#[test]
fn glob_outside_the_context_keeps_leading_parent_segments() {
    assert_eq!(
        keys_for(
            PatternBuilder::new("../*.txt")
                .context("directory")
                .to("up")
                .build()
        ),
        vec!["file.txt"]
    );
    assert_eq!(
        keys_for(PatternBuilder::new("../*.txt").context("directory").build()),
        vec!["../file.txt"]
    );
}

#[test]
fn flatten_drops_the_relative_directory() {
    assert_eq!(
        keys_for(
            PatternBuilder::new("directory")
                .to("flat")
                .flatten(true)
                .build()
        ),
        vec![
            "flat/.dottedfile",
            "flat/deepnested.txt",
            "flat/directoryfile.txt",
            "flat/nestedfile.txt",
        ]
    );
}

#[test]
fn template_destination_interpolates_tokens() {
    let expected_hash = blake3::hash(b"nested").to_hex().to_string();
    assert_eq!(
        keys_for(
            PatternBuilder::new("directory/nested/nestedfile.txt")
                .to("static/[name].[hash:8].[ext]")
                .build()
        ),
        vec![format!("static/nestedfile.{}.txt", &expected_hash[..8])]
    );
    assert_eq!(
        keys_for(
            PatternBuilder::new("directory/**/*.txt")
                .to("[path][name]-copy.[ext]")
                .build()
        ),
        vec![
            "directory/directoryfile-copy.txt",
            "directory/nested/deep/deepnested-copy.txt",
            "directory/nested/nestedfile-copy.txt",
        ]
    );
}

#[test]
fn flattened_template_has_an_empty_path() {
    assert_eq!(
        keys_for(
            PatternBuilder::new("directory/**/*.txt")
                .to("out/[path][name].[ext]")
                .flatten(true)
                .build()
        ),
        vec![
            "out/deepnested.txt",
            "out/directoryfile.txt",
            "out/nestedfile.txt",
        ]
    );
}

#[test]
fn to_type_inference_rules() {
    assert_eq!(infer_to_type(None, None, false), ToType::Dir);
    assert_eq!(infer_to_type(None, Some(""), false), ToType::Dir);
    assert_eq!(infer_to_type(None, Some("out/"), false), ToType::Dir);
    assert_eq!(infer_to_type(None, Some("out"), false), ToType::Dir);
    assert_eq!(infer_to_type(None, Some("out.txt"), false), ToType::File);
    assert_eq!(infer_to_type(None, Some("out.txt"), true), ToType::Dir);
    assert_eq!(infer_to_type(None, Some("[name].[ext]"), false), ToType::Template);
    assert_eq!(infer_to_type(Some(ToType::File), Some("out"), true), ToType::File);
}

#[test]
fn interpolate_handles_names_without_extension() {
    assert_eq!(interpolate("[name]-[ext]", "a/noextension", b""), "noextension-");
    assert_eq!(interpolate("[path][name]", "a/b/c.tar.gz", b""), "a/b/c.tar");
    assert_eq!(interpolate("[hash]", "x", b"abc").len(), 64);
}

#[test]
fn relative_to_walks_up_and_down() {
    assert_eq!(relative_to(Path::new("/a/b"), Path::new("/a/c/d")), PathBuf::from("../c/d"));
    assert_eq!(relative_to(Path::new("/a/b"), Path::new("/a/b")), PathBuf::new());
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..5)
}

proptest! {
    #[test]
    fn dir_mapping_is_deterministic(to in segment(), rel in relative_path()) {
        let rel = rel.join("/");
        let output = PathBuf::from("/out");
        let dest = Destination {
            to: Some(to.as_str()),
            to_type: ToType::Dir,
            flatten: false,
            output_root: &output,
        };

        let first = map_destination(&dest, &rel, b"content");
        let second = map_destination(&dest, &rel, b"content");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, format!("{to}/{rel}"));
    }

    #[test]
    fn flatten_keeps_only_the_base_name(to in segment(), rel in relative_path()) {
        let base = rel.last().cloned().unwrap_or_default();
        let rel = rel.join("/");
        let output = PathBuf::from("/out");
        let dest = Destination {
            to: Some(to.as_str()),
            to_type: ToType::Dir,
            flatten: true,
            output_root: &output,
        };

        prop_assert_eq!(map_destination(&dest, &rel, b""), format!("{to}/{base}"));
    }

    #[test]
    fn normalize_is_idempotent(
        parts in proptest::collection::vec(
            prop_oneof![segment(), Just(".".to_string()), Just("..".to_string())],
            0..8,
        )
    ) {
        let path = PathBuf::from(parts.join("/"));
        let once = normalize(&path);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(once.components().all(|c| c != std::path::Component::CurDir));
    }
}
