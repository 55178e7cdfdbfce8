//! Vacancy fetching from the search API

use crate::planner::DateWindow;
use crate::VacancyPage;
use async_trait::async_trait;

pub mod hh;
pub mod pagination;

pub use hh::HhClient;
pub use pagination::fetch_window;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Request timed out
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Upstream signalled rate limiting (HTTP 403)
    #[error("rate limited by upstream")]
    RateLimited,

    /// Any other non-success HTTP status
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Response body could not be deserialized
    #[error("parse error: {0}")]
    Parse(String),

    /// Any other transport-level failure
    #[error("http error: {0}")]
    Http(String),
}

impl FetcherError {
    /// Whether the failure is worth retrying against the per-window budget.
    ///
    /// Only timeouts and connection failures qualify; everything else
    /// abandons the window immediately. Rate limiting is handled separately
    /// and never consumes the budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetcherError::Timeout(_) | FetcherError::Connect(_))
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// A paged vacancy search backend.
///
/// The production implementation is [`HhClient`]; tests substitute fakes
/// that script page sequences and failures.
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// Fetch one page of search results for `query` within `window`.
    ///
    /// # Arguments
    /// * `query` - Free-text search query
    /// * `window` - Half-open date window the results must fall into
    /// * `page` - Zero-based page index
    /// * `page_size` - Items requested per page
    async fn fetch_page(
        &self,
        query: &str,
        window: &DateWindow,
        page: u32,
        page_size: u32,
    ) -> FetcherResult<VacancyPage>;
}
