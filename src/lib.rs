//! # Vacancy Exporter Library
//!
//! A small library for collecting job vacancies from the HeadHunter
//! (api.hh.ru) public search API over a rolling date window and exporting
//! them into a styled xlsx workbook.
//!
//! ## Features
//!
//! - **Date-Window Planning**: Splits a lookback period into bounded
//!   sub-windows so no single query trips the upstream result cap
//! - **Paginated Fetching**: Page-indexed search requests with a per-window
//!   retry budget and rate-limit cooldowns
//! - **Spreadsheet Export**: One styled worksheet table per run, with a
//!   filesystem-safe filename derived from the query
//! - **Cancellable Worker**: The whole pipeline runs on a single background
//!   task that reports log/progress events and honors cooperative
//!   cancellation
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vacancy_exporter::config::FetchPolicy;
//! use vacancy_exporter::fetcher::HhClient;
//! use vacancy_exporter::worker::{ExportWorker, WorkerEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(HhClient::new(113)?);
//! let (worker, mut events) = ExportWorker::new(source, FetchPolicy::default(), ".".into());
//!
//! worker.start("welder");
//! while let Some(event) = events.recv().await {
//!     match event {
//!         WorkerEvent::Log(line) => println!("{line}"),
//!         WorkerEvent::Progress(pct) => println!("{pct}%"),
//!         WorkerEvent::Finished(status) => {
//!             println!("finished: {status}");
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`planner`] - Date-window planning over the lookback period
//! - [`fetcher`] - Paginated vacancy fetching with retry and rate-limit
//!   handling
//! - [`export`] - Xlsx export with a fixed column schema
//! - [`worker`] - Cancellable background run with event reporting
//! - [`cancel`] - Cooperative cancellation token shared across modules
//! - [`config`] - Fetch policy constants and overrides

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// Cooperative cancellation coordination
pub mod cancel;

/// CLI command implementations
pub mod cli;

/// Fetch policy constants and overrides
pub mod config;

/// Spreadsheet export
pub mod export;

/// Vacancy fetching from the search API
pub mod fetcher;

/// Date-window planning
pub mod planner;

/// Cancellable background worker
pub mod worker;

// Re-export commonly used types
pub use planner::DateWindow;
pub use worker::{ExportWorker, RunStatus, WorkerEvent};

/// Salary range attached to a vacancy. Every bound is optional; a vacancy
/// may state only one of them, or none at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    /// Lower bound, in `currency` units
    pub from: Option<i64>,
    /// Upper bound, in `currency` units
    pub to: Option<i64>,
    /// Currency code (e.g., "RUR", "USD")
    pub currency: Option<String>,
}

/// Employer that published the vacancy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    /// Display name of the employer
    pub name: Option<String>,
}

/// Region the vacancy belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Display name of the region
    pub name: Option<String>,
}

/// One raw vacancy as returned by the search API.
///
/// Every field is optional: the upstream contract makes no promises, and a
/// missing or null field must never abort a run. Unknown fields in the
/// payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    /// Vacancy title
    pub name: Option<String>,
    /// Publishing employer
    pub employer: Option<Employer>,
    /// Salary range, absent when not disclosed
    pub salary: Option<Salary>,
    /// Region of the vacancy
    pub area: Option<Area>,
    /// Publish timestamp as an RFC3339-like string (the API emits a
    /// colon-less UTC offset, e.g. `2024-05-01T10:00:00+0300`)
    pub published_at: Option<String>,
    /// Canonical vacancy URL
    pub alternate_url: Option<String>,
}

/// One page of the paged search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyPage {
    /// Vacancies on this page
    #[serde(default)]
    pub items: Vec<Vacancy>,
    /// Total page count reported by the API for this query
    #[serde(default)]
    pub pages: u32,
    /// Zero-based index of this page
    #[serde(default)]
    pub page: u32,
    /// Total number of matches across all pages
    #[serde(default)]
    pub found: u64,
}
