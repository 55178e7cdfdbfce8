//! Date-window planning over the lookback period.
//!
//! The search API caps how many results a single query may return, so one
//! run never queries the whole lookback at once. The planner slices the
//! period into bounded half-open windows that are walked oldest first.

use crate::config::{LOOKBACK_DAYS, WINDOW_STEP_DAYS};
use chrono::{DateTime, Duration, Timelike, Utc};

/// Half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// Inclusive window start
    pub start: DateTime<Utc>,
    /// Exclusive window end
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window length.
    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Split `[start, end)` into consecutive windows of at most `step` each.
///
/// The result is ordered oldest first, covers the span exactly with no gaps
/// or overlaps, and the final window carries the remainder when the span is
/// not divisible by `step`. An empty span produces no windows.
pub fn split_into_windows(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Vec<DateWindow> {
    let mut windows = Vec::new();
    let mut current = start;

    while current < end {
        let next = (current + step).min(end);
        windows.push(DateWindow {
            start: current,
            end: next,
        });
        current = next;
    }

    windows
}

/// Plan the windows for one run ending at `now`.
///
/// The window end is `now` truncated to midnight, the lookback is
/// [`LOOKBACK_DAYS`] and the step is [`WINDOW_STEP_DAYS`].
pub fn lookback_windows(now: DateTime<Utc>) -> Vec<DateWindow> {
    plan_windows(now, LOOKBACK_DAYS, WINDOW_STEP_DAYS)
}

/// Plan windows for a custom lookback and step, both in days.
///
/// Non-positive spans or steps produce an empty plan rather than panicking;
/// callers validate their arguments at the CLI boundary.
pub fn plan_windows(now: DateTime<Utc>, lookback_days: i64, step_days: i64) -> Vec<DateWindow> {
    if lookback_days <= 0 || step_days <= 0 {
        return Vec::new();
    }

    let end = truncate_to_midnight(now);
    let start = end - Duration::days(lookback_days);
    split_into_windows(start, end, Duration::days(step_days))
}

fn truncate_to_midnight(ts: DateTime<Utc>) -> DateTime<Utc> {
    // with_* only fails on out-of-range values; 0 is always in range.
    ts.with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
