//! HTTP client for the hh.ru vacancy search endpoint.
//!
//! One method, one request: retry, cooldown and pacing decisions all live in
//! [`pagination`](crate::fetcher::pagination). This module only classifies
//! transport failures into the [`FetcherError`] taxonomy the loop acts on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::debug;

use crate::config::REQUEST_TIMEOUT;
use crate::planner::DateWindow;
use crate::VacancyPage;

use super::{FetcherError, FetcherResult, VacancySource};

/// Production base URL of the search API.
pub const DEFAULT_BASE_URL: &str = "https://api.hh.ru";

// The API rejects anonymous clients, so a User-Agent is always sent.
const USER_AGENT: &str = concat!("vacancy-exporter/", env!("CARGO_PKG_VERSION"));

/// Vacancy search client for api.hh.ru.
pub struct HhClient {
    client: Client,
    base_url: String,
    area: u32,
}

impl HhClient {
    /// Create a client against the production API.
    ///
    /// # Arguments
    /// * `area` - Region code restricting the search (113 = Russia)
    pub fn new(area: u32) -> FetcherResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, area)
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: impl Into<String>, area: u32) -> FetcherResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetcherError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            area,
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl VacancySource for HhClient {
    async fn fetch_page(
        &self,
        query: &str,
        window: &DateWindow,
        page: u32,
        page_size: u32,
    ) -> FetcherResult<VacancyPage> {
        let url = format!("{}/vacancies", self.base_url);
        let params = [
            ("text", query.to_string()),
            ("area", self.area.to_string()),
            ("date_from", format_api_datetime(window.start)),
            ("date_to", format_api_datetime(window.end)),
            ("per_page", page_size.to_string()),
            ("page", page.to_string()),
        ];

        debug!(%url, page, window = %window, "requesting vacancies page");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.as_u16() == 403 {
            return Err(FetcherError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FetcherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<VacancyPage>()
            .await
            .map_err(|e| FetcherError::Parse(e.to_string()))
    }
}

/// Map a transport failure onto the retry taxonomy.
fn classify_request_error(err: reqwest::Error) -> FetcherError {
    if err.is_timeout() {
        FetcherError::Timeout(err.to_string())
    } else if err.is_connect() {
        FetcherError::Connect(err.to_string())
    } else {
        FetcherError::Http(err.to_string())
    }
}

/// Format a timestamp the way the API expects its `date_from`/`date_to`
/// parameters: ISO-8601 seconds precision, no offset designator.
fn format_api_datetime(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}
