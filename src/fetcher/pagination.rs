//! Paged fetch loop for one date window.
//!
//! Walks zero-based page indices until the page count reported by the API is
//! exhausted, the per-window retry budget runs out, or cancellation is
//! observed. The loop never fails outward: whatever was accumulated before
//! an abandonment is the result. Partial data beats no data here, and the
//! caller treats every window independently.

use std::time::Duration;

use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::FetchPolicy;
use crate::planner::DateWindow;
use crate::Vacancy;

use super::{FetcherError, VacancySource};

/// Fetch all pages of `query` within `window`, accumulating items.
///
/// Retry policy:
/// - timeouts and connection failures decrement the window's retry budget
///   and pause ([`FetchPolicy::timeout_retry_pause`] /
///   [`FetchPolicy::connect_retry_pause`]) before retrying the same page;
///   an exhausted budget abandons the window
/// - a rate-limit response pauses [`FetchPolicy::rate_limit_cooldown`] and
///   retries the same page without touching the budget
/// - any other failure abandons the window immediately
///
/// Cancellation is observed before each request and during every pause.
pub async fn fetch_window(
    source: &dyn VacancySource,
    query: &str,
    window: &DateWindow,
    policy: &FetchPolicy,
    cancel: &CancelToken,
) -> Vec<Vacancy> {
    let mut items = Vec::new();
    let mut budget = policy.retry_budget;
    let mut page: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            debug!(window = %window, page, "cancellation observed before page request");
            break;
        }

        match source.fetch_page(query, window, page, policy.page_size).await {
            Ok(fetched) => {
                let total_pages = fetched.pages;
                debug!(
                    window = %window,
                    page,
                    total_pages,
                    page_items = fetched.items.len(),
                    "page fetched"
                );
                items.extend(fetched.items);

                // Zero-based index: the last page is (total_pages - 1).
                if page + 1 >= total_pages {
                    break;
                }
                page += 1;

                if !pause(policy.page_delay, cancel).await {
                    break;
                }
            }
            Err(FetcherError::RateLimited) => {
                warn!(window = %window, page, "rate limited; cooling down");
                if !pause(policy.rate_limit_cooldown, cancel).await {
                    break;
                }
            }
            Err(err) if err.is_transient() => {
                if budget == 0 {
                    break;
                }
                budget -= 1;
                if budget == 0 {
                    warn!(
                        window = %window,
                        page,
                        error = %err,
                        "retry budget exhausted; abandoning window"
                    );
                    break;
                }

                let pause_for = match &err {
                    FetcherError::Timeout(_) => policy.timeout_retry_pause,
                    _ => policy.connect_retry_pause,
                };
                warn!(
                    window = %window,
                    page,
                    error = %err,
                    retries_left = budget,
                    pause_ms = pause_for.as_millis(),
                    "transient failure; retrying same page"
                );
                if !pause(pause_for, cancel).await {
                    break;
                }
            }
            Err(err) => {
                warn!(window = %window, page, error = %err, "request failed; abandoning window");
                break;
            }
        }
    }

    items
}

/// Sleep for `duration`, racing the cancellation token.
///
/// Returns false when cancellation fired first; the fetch loop exits on
/// that instead of issuing another request.
async fn pause(duration: Duration, cancel: &CancelToken) -> bool {
    if duration.is_zero() {
        return !cancel.is_cancelled();
    }

    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}
