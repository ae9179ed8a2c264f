//! A small source tree shared by the integration tests.
//!
//! ```text
//! /project/file.txt
//! /project/binextension.bin
//! /project/noextension
//! /project/.dottedfile
//! /project/directory/directoryfile.txt
//! /project/directory/.dottedfile
//! /project/directory/nested/nestedfile.txt
//! /project/directory/nested/deep/deepnested.txt
//! ```
//!
//! The build context is `/project` and the output root `/project/build`.

use std::sync::Arc;

use assetcopy::engine::{BuildCycle, CopyEngine};
use assetcopy::config::{GlobalOptions, Pattern};
use assetcopy::fs::FileSystem;
use assetcopy::fs::mock::MockFileSystem;

pub const CONTEXT: &str = "/project";
pub const OUTPUT: &str = "/project/build";

pub fn project_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/project/file.txt", "new");
    fs.add_file("/project/binextension.bin", vec![0u8, 1, 2, 3]);
    fs.add_file("/project/noextension", "no extension");
    fs.add_file("/project/.dottedfile", "dotted");
    fs.add_file("/project/directory/directoryfile.txt", "new");
    fs.add_file("/project/directory/.dottedfile", "dottedfile contents");
    fs.add_file("/project/directory/nested/nestedfile.txt", "nested");
    fs.add_file("/project/directory/nested/deep/deepnested.txt", "deep");
    fs.add_dir("/project/build");
    fs
}

pub fn new_cycle() -> BuildCycle {
    BuildCycle::new(CONTEXT, OUTPUT)
}

pub fn engine(fs: &MockFileSystem, patterns: Vec<Pattern>, options: GlobalOptions) -> CopyEngine {
    let fs: Arc<dyn FileSystem> = Arc::new(fs.clone());
    CopyEngine::from_patterns(patterns, options, fs).expect("valid patterns")
}

/// Run one full cycle (pre-emit + post-emit) on a fresh `BuildCycle`.
pub fn run_cycle(engine: &mut CopyEngine) -> BuildCycle {
    let mut cycle = new_cycle();
    run_cycle_into(engine, &mut cycle);
    cycle
}

/// Run one full cycle on a caller-prepared `BuildCycle`.
pub fn run_cycle_into(engine: &mut CopyEngine, cycle: &mut BuildCycle) {
    engine.run_pre_emit(cycle).expect("pre-emit");
    engine.run_post_emit(cycle).expect("post-emit");
}

/// Sorted asset keys of a cycle.
pub fn keys(cycle: &BuildCycle) -> Vec<String> {
    cycle.assets.keys().map(str::to_string).collect()
}

/// Asset content as UTF-8, for readable assertions.
pub fn content(cycle: &BuildCycle, key: &str) -> Option<String> {
    cycle
        .assets
        .get(key)
        .map(|a| String::from_utf8_lossy(a.content()).into_owned())
}
