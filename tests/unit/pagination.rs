//! Unit tests for the paged fetch loop: termination and accumulation.

use chrono::{Duration, TimeZone, Utc};
use vacancy_exporter::cancel::CancelToken;
use vacancy_exporter::config::FetchPolicy;
use vacancy_exporter::fetcher::fetch_window;
use vacancy_exporter::planner::DateWindow;

use crate::common::fake_source::{page, FakeSource};

fn window() -> DateWindow {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    DateWindow {
        start,
        end: start + Duration::days(7),
    }
}

#[tokio::test]
async fn test_single_page_window() {
    let source = FakeSource::new(vec![Ok(page(42, 1))]);
    let cancel = CancelToken::new();

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    assert_eq!(items.len(), 42);
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_multi_page_window_accumulates_all_items() {
    // 3 pages of 100/100/50: totals must match and pagination must stop
    // exactly at the reported page count.
    let source = FakeSource::new(vec![Ok(page(100, 3)), Ok(page(100, 3)), Ok(page(50, 3))]);
    let cancel = CancelToken::new();

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    assert_eq!(items.len(), 250);
    assert_eq!(source.call_count(), 3);
    assert_eq!(source.remaining(), 0);

    let pages: Vec<u32> = source.calls().iter().map(|c| c.page).collect();
    assert_eq!(pages, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_zero_pages_stops_after_first_request() {
    let source = FakeSource::new(vec![Ok(page(0, 0))]);
    let cancel = CancelToken::new();

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    assert!(items.is_empty());
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_request_parameters_carry_the_window() {
    let source = FakeSource::new(vec![Ok(page(1, 1))]);
    let cancel = CancelToken::new();
    let w = window();

    fetch_window(&source, "C++ dev", &w, &FetchPolicy::without_pauses(), &cancel).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query, "C++ dev");
    assert_eq!(calls[0].window_start, w.start);
    assert_eq!(calls[0].window_end, w.end);
    assert_eq!(calls[0].page_size, FetchPolicy::default().page_size);
}

#[tokio::test]
async fn test_hard_error_abandons_window_keeping_prior_pages() {
    use vacancy_exporter::fetcher::FetcherError;

    let source = FakeSource::new(vec![
        Ok(page(100, 5)),
        Err(FetcherError::Status {
            status: 500,
            body: "server error".to_string(),
        }),
    ]);
    let cancel = CancelToken::new();

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    // The failed page is not retried and the rest of the window is skipped,
    // but the first page survives.
    assert_eq!(items.len(), 100);
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_parse_error_abandons_window() {
    use vacancy_exporter::fetcher::FetcherError;

    let source = FakeSource::new(vec![Err(FetcherError::Parse("bad json".to_string()))]);
    let cancel = CancelToken::new();

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    assert!(items.is_empty());
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_cancellation_before_first_request() {
    let source = FakeSource::new(vec![Ok(page(10, 1))]);
    let cancel = CancelToken::new();
    cancel.cancel();

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    assert!(items.is_empty());
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_cancellation_between_pages() {
    let source = FakeSource::new(vec![Ok(page(100, 3)), Ok(page(100, 3))]);
    let cancel = CancelToken::shared();

    // Cancel while the first page is in flight; the loop must not issue
    // the second request.
    {
        let token = cancel.clone();
        source.set_call_hook(move |index| {
            if index == 0 {
                token.cancel();
            }
        });
    }

    let items = fetch_window(
        &source,
        "welder",
        &window(),
        &FetchPolicy::without_pauses(),
        &cancel,
    )
    .await;

    assert_eq!(items.len(), 100);
    assert_eq!(source.call_count(), 1);
}
