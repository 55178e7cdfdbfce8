//! End-to-end runs against a scripted upstream: default 30-day plan,
//! five windows, export or "nothing found".

use std::sync::Arc;

use vacancy_exporter::config::FetchPolicy;
use vacancy_exporter::worker::{ExportWorker, RunStatus};

use crate::common::events::{assert_no_more_events, drain_until_finished};
use crate::common::fake_source::{page, FakeSource};

#[tokio::test]
async fn test_default_plan_walks_five_windows_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    // One single-page response per window: 4 full weeks + the 2-day tail.
    let source = Arc::new(FakeSource::new(vec![
        Ok(page(4, 1)),
        Ok(page(3, 1)),
        Ok(page(2, 1)),
        Ok(page(1, 1)),
        Ok(page(1, 1)),
    ]));
    let (worker, mut events) = ExportWorker::new(
        source.clone(),
        FetchPolicy::without_pauses(),
        dir.path().to_path_buf(),
    );

    assert!(worker.start("welder"));
    let trace = drain_until_finished(&mut events).await;

    assert_eq!(trace.statuses, vec![RunStatus::Completed]);
    assert_no_more_events(&mut events);

    // 30 days at a 7-day step: exactly five windows, oldest first.
    assert_eq!(trace.log_count("Fetching period:"), 5);
    assert_eq!(source.call_count(), 5);

    let calls = source.calls();
    for pair in calls.windows(2) {
        assert_eq!(pair[0].window_end, pair[1].window_start);
        assert!(pair[0].window_start < pair[1].window_start);
    }
    let tail = calls.last().unwrap();
    assert_eq!(tail.window_end - tail.window_start, chrono::Duration::days(2));

    assert_eq!(trace.log_count("Total vacancies collected: 11"), 1);
    assert!(dir.path().join("welder_vacancies.xlsx").exists());
    assert_eq!(*trace.progress.first().unwrap(), 0);
    assert_eq!(*trace.progress.last().unwrap(), 100);
}

#[tokio::test]
async fn test_empty_upstream_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FakeSource::new(vec![
        Ok(page(0, 1)),
        Ok(page(0, 1)),
        Ok(page(0, 1)),
        Ok(page(0, 1)),
        Ok(page(0, 1)),
    ]));
    let (worker, mut events) = ExportWorker::new(
        source,
        FetchPolicy::without_pauses(),
        dir.path().to_path_buf(),
    );

    assert!(worker.start("welder"));
    let trace = drain_until_finished(&mut events).await;

    assert_eq!(trace.statuses, vec![RunStatus::Completed]);
    assert_eq!(trace.log_count("No matching vacancies found"), 1);

    // Nothing collected, nothing written.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_sanitized_filename_for_special_query() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FakeSource::new(vec![Ok(page(1, 1))]));
    let (worker, mut events) = ExportWorker::new(
        source,
        FetchPolicy::without_pauses(),
        dir.path().to_path_buf(),
    );
    let worker = worker.with_plan(1, 1);

    assert!(worker.start("C++ dev/eng"));
    let trace = drain_until_finished(&mut events).await;

    assert_eq!(trace.statuses, vec![RunStatus::Completed]);
    assert!(dir.path().join("C___dev_eng_vacancies.xlsx").exists());
}
