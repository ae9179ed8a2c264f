// tests/runtime_cycles.rs

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use assetcopy::config::GlobalOptions;
use assetcopy::engine::{CycleRunner, RunnerEvent};
use assetcopy_test_utils::builders::PatternBuilder;
use assetcopy_test_utils::fixtures::{engine, project_fs, CONTEXT, OUTPUT};
use assetcopy_test_utils::recording_host::RecordingHost;
use assetcopy_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn runner_executes_cycles_in_order_until_shutdown() -> TestResult {
    init_tracing();
    let fs = project_fs();
    let engine = engine(
        &fs,
        vec![PatternBuilder::new("directory").to("static").build()],
        GlobalOptions::default(),
    );

    let settled = Arc::new(Mutex::new(Vec::new()));
    let host = RecordingHost::new(CONTEXT, OUTPUT, Arc::clone(&settled));
    let (tx, rx) = mpsc::channel(8);

    tx.send(RunnerEvent::CycleRequested).await?;
    tx.send(RunnerEvent::CycleRequested).await?;
    tx.send(RunnerEvent::ShutdownRequested).await?;
    // Never reached: the runner stops at the shutdown event.
    tx.send(RunnerEvent::CycleRequested).await?;

    let summary = with_timeout(CycleRunner::new(engine, rx, host).run()).await?;
    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failed_cycles, 0);

    let settled = settled.lock().unwrap();
    assert_eq!(settled.len(), 2);

    let (first, first_report) = &settled[0];
    assert_eq!(first_report.copied, 4);
    assert!(first.assets.contains("static/directoryfile.txt"));
    // The host cleared the lists during emit; post-emit put them back.
    assert!(first
        .context_dependencies
        .contains(Path::new("/project/directory")));

    let (second, second_report) = &settled[1];
    assert_eq!(second_report.unchanged, 4);
    assert!(second.assets.is_empty());
    assert_eq!(second.context_dependencies.len(), 1);
    Ok(())
}

#[tokio::test]
async fn runner_exits_when_all_senders_are_dropped() -> TestResult {
    let fs = project_fs();
    let engine = engine(
        &fs,
        vec![PatternBuilder::new("file.txt").build()],
        GlobalOptions::default(),
    );

    let settled = Arc::new(Mutex::new(Vec::new()));
    let host = RecordingHost::new(CONTEXT, OUTPUT, Arc::clone(&settled));
    let (tx, rx) = mpsc::channel(8);

    tx.send(RunnerEvent::CycleRequested).await?;
    drop(tx);

    let summary = with_timeout(CycleRunner::new(engine, rx, host).run()).await?;
    assert_eq!(summary.cycles, 1);
    assert_eq!(settled.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn cycle_with_errors_is_counted_as_failed() -> TestResult {
    let fs = project_fs();
    fs.deny("/project/file.txt");
    let engine = engine(
        &fs,
        vec![PatternBuilder::new("*.txt").build()],
        GlobalOptions::default(),
    );

    let settled = Arc::new(Mutex::new(Vec::new()));
    let host = RecordingHost::new(CONTEXT, OUTPUT, Arc::clone(&settled));
    let (tx, rx) = mpsc::channel(8);

    tx.send(RunnerEvent::CycleRequested).await?;
    tx.send(RunnerEvent::ShutdownRequested).await?;

    let summary = with_timeout(CycleRunner::new(engine, rx, host).run()).await?;
    assert_eq!(summary.failed_cycles, 1);

    let settled = settled.lock().unwrap();
    let (cycle, report) = &settled[0];
    assert_eq!(report.errors, 1);
    assert_eq!(cycle.errors[0].path, Path::new("/project/file.txt"));
    Ok(())
}

#[tokio::test]
async fn host_provided_assets_are_respected() -> TestResult {
    let fs = project_fs();
    let engine = engine(
        &fs,
        vec![
            PatternBuilder::new("file.txt").build(),
            PatternBuilder::new("noextension").force(true).build(),
        ],
        GlobalOptions::default(),
    );

    let settled = Arc::new(Mutex::new(Vec::new()));
    let host = RecordingHost::new(CONTEXT, OUTPUT, Arc::clone(&settled))
        .with_existing_asset("file.txt", b"from another plugin")
        .with_existing_asset("noextension", b"stale");
    let (tx, rx) = mpsc::channel(8);

    tx.send(RunnerEvent::CycleRequested).await?;
    tx.send(RunnerEvent::ShutdownRequested).await?;
    with_timeout(CycleRunner::new(engine, rx, host).run()).await?;

    let settled = settled.lock().unwrap();
    let (cycle, report) = &settled[0];
    assert_eq!(report.skipped_existing, 1);
    assert_eq!(
        cycle.assets.get("file.txt").map(|a| a.content()),
        Some(&b"from another plugin"[..])
    );
    assert_eq!(
        cycle.assets.get("noextension").map(|a| a.content()),
        Some(&b"no extension"[..])
    );
    Ok(())
}
