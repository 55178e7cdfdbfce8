//! Export command implementation.
//!
//! The CLI is the control surface over the worker: it starts one run,
//! renders log lines and a progress bar from the event stream, and maps
//! Ctrl+C onto cooperative cancellation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::config::{FetchPolicy, DEFAULT_AREA, LOOKBACK_DAYS, WINDOW_STEP_DAYS};
use crate::fetcher::HhClient;
use crate::worker::{ExportWorker, RunStatus, WorkerEvent};

use super::CliError;

/// Vacancy exporter CLI
#[derive(Debug, Parser)]
#[command(
    name = "vacancy-exporter",
    version,
    about = "Export hh.ru vacancies for a search query into an xlsx workbook"
)]
pub struct Cli {
    /// Free-text search query (e.g. "welder")
    pub query: String,

    /// Lookback period in days
    #[arg(long, default_value_t = LOOKBACK_DAYS)]
    pub days: i64,

    /// Maximum length of one search window in days
    #[arg(long = "step-days", default_value_t = WINDOW_STEP_DAYS)]
    pub step_days: i64,

    /// Region code restricting the search (113 = Russia)
    #[arg(long, default_value_t = DEFAULT_AREA)]
    pub area: u32,

    /// Directory the workbook is written into
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

impl Cli {
    /// Validate arguments that clap cannot check on its own.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.query.trim().is_empty() {
            return Err(CliError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }
        if self.days <= 0 {
            return Err(CliError::InvalidArgument(format!(
                "--days must be positive, got {}",
                self.days
            )));
        }
        if self.step_days <= 0 {
            return Err(CliError::InvalidArgument(format!(
                "--step-days must be positive, got {}",
                self.step_days
            )));
        }
        Ok(())
    }

    /// Run the export end to end and return the terminal status.
    pub async fn execute(&self) -> Result<RunStatus, CliError> {
        self.validate()?;

        let source = Arc::new(HhClient::new(self.area)?);
        let (worker, mut events) =
            ExportWorker::new(source, FetchPolicy::default(), self.output_dir.clone());
        let worker = Arc::new(worker.with_plan(self.days, self.step_days));

        // Ctrl+C requests cooperative cancellation; the run winds down at
        // the next window or page boundary.
        tokio::spawn({
            let worker = Arc::clone(&worker);
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Ctrl+C received - cancelling run");
                    worker.cancel();
                }
            }
        });

        worker.start(self.query.trim());

        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        while let Some(event) = events.recv().await {
            match event {
                WorkerEvent::Log(line) => bar.println(line),
                WorkerEvent::Progress(pct) => bar.set_position(u64::from(pct)),
                WorkerEvent::Finished(status) => {
                    bar.finish_and_clear();
                    return Ok(status);
                }
            }
        }

        // The worker guarantees a terminal event; a closed channel without
        // one means the task itself is gone.
        bar.finish_and_clear();
        Err(CliError::WorkerStopped)
    }
}
