//! Fetch policy constants and per-run overrides

use std::time::Duration;

/// Retry budget per date window.
/// Three transient failures in a row abandon the window; whatever was
/// accumulated up to that point is kept.
pub const RETRY_BUDGET: u32 = 3;

/// Pause before retrying a page after a connection failure.
pub const CONNECT_RETRY_PAUSE: Duration = Duration::from_secs(5);

/// Pause before retrying a page after a request timeout.
pub const TIMEOUT_RETRY_PAUSE: Duration = Duration::from_secs(3);

/// Cooldown after a rate-limit response (HTTP 403) before retrying the
/// same page. Rate-limit retries do not consume the retry budget.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(10);

/// Delay between successful pages, to stay under the upstream rate limit.
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Delay between date windows.
pub const WINDOW_DELAY: Duration = Duration::from_secs(1);

/// Per-request timeout applied to every HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Items requested per page. 100 is the maximum the search API accepts.
pub const PAGE_SIZE: u32 = 100;

/// Lookback period covered by one run, in days.
pub const LOOKBACK_DAYS: i64 = 30;

/// Maximum length of a single date window, in days. The API caps the
/// number of results per query, so the lookback is fetched in slices.
pub const WINDOW_STEP_DAYS: i64 = 7;

/// Default search region code (113 = Russia).
pub const DEFAULT_AREA: u32 = 113;

/// Tunable knobs of the fetch loop.
///
/// [`FetchPolicy::default`] mirrors the production constants above; tests
/// shrink the pauses to keep the suite fast. All fields are public so a
/// policy can be built with struct-update syntax from the default.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Transient-failure retry budget per date window
    pub retry_budget: u32,
    /// Pause before retrying after a connection failure
    pub connect_retry_pause: Duration,
    /// Pause before retrying after a timeout
    pub timeout_retry_pause: Duration,
    /// Cooldown after a rate-limit response
    pub rate_limit_cooldown: Duration,
    /// Delay between successful pages
    pub page_delay: Duration,
    /// Delay between date windows
    pub window_delay: Duration,
    /// Requested page size
    pub page_size: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retry_budget: RETRY_BUDGET,
            connect_retry_pause: CONNECT_RETRY_PAUSE,
            timeout_retry_pause: TIMEOUT_RETRY_PAUSE,
            rate_limit_cooldown: RATE_LIMIT_COOLDOWN,
            page_delay: PAGE_DELAY,
            window_delay: WINDOW_DELAY,
            page_size: PAGE_SIZE,
        }
    }
}

impl FetchPolicy {
    /// Policy with all pauses set to zero. Intended for tests and dry runs
    /// where wall-clock delays only slow things down.
    pub fn without_pauses() -> Self {
        Self {
            connect_retry_pause: Duration::ZERO,
            timeout_retry_pause: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
            page_delay: Duration::ZERO,
            window_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
