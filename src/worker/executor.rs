//! Run executor: the worker-side state machine.
//!
//! One [`ExportWorker`] accepts at most one active run. `start` moves
//! Idle → Running; the spawned task walks the planned windows, accumulates
//! vacancies, exports, and always leaves Running through exactly one
//! terminal [`WorkerEvent::Finished`], whatever the exit reason.

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

use crate::cancel::{CancelToken, SharedCancel};
use crate::config::{FetchPolicy, LOOKBACK_DAYS, WINDOW_STEP_DAYS};
use crate::export;
use crate::fetcher::{fetch_window, VacancySource};
use crate::planner;
use crate::worker::{RunProgress, RunStatus, WorkerEvent};
use crate::Vacancy;

/// Controller-facing handle around the background pipeline.
pub struct ExportWorker {
    source: Arc<dyn VacancySource>,
    policy: FetchPolicy,
    output_dir: PathBuf,
    lookback_days: i64,
    step_days: i64,
    events: UnboundedSender<WorkerEvent>,
    running: Arc<AtomicBool>,
    current_cancel: Mutex<Option<SharedCancel>>,
}

impl ExportWorker {
    /// Create a worker and the event stream its runs will report into.
    ///
    /// # Arguments
    /// * `source` - Search backend the runs will page through
    /// * `policy` - Retry/pacing policy applied per window
    /// * `output_dir` - Directory the workbook is written into
    pub fn new(
        source: Arc<dyn VacancySource>,
        policy: FetchPolicy,
        output_dir: PathBuf,
    ) -> (Self, UnboundedReceiver<WorkerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();

        let worker = Self {
            source,
            policy,
            output_dir,
            lookback_days: LOOKBACK_DAYS,
            step_days: WINDOW_STEP_DAYS,
            events,
            running: Arc::new(AtomicBool::new(false)),
            current_cancel: Mutex::new(None),
        };

        (worker, receiver)
    }

    /// Override the lookback period and window step, both in days.
    pub fn with_plan(mut self, lookback_days: i64, step_days: i64) -> Self {
        self.lookback_days = lookback_days;
        self.step_days = step_days;
        self
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start a run for `query`.
    ///
    /// Returns false (and emits a warning log event) when a run is already
    /// active; the request is otherwise a no-op in that case.
    pub fn start(&self, query: &str) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(query, "a run is already active; start request ignored");
            self.send(WorkerEvent::Log(
                "A run is already active; start request ignored".to_string(),
            ));
            return false;
        }

        let cancel = CancelToken::shared();
        // Poisoning would require a panic while holding this lock; neither
        // critical section below can panic.
        *self
            .current_cancel
            .lock()
            .expect("cancel handle lock poisoned") = Some(cancel.clone());

        info!(query, "starting export run");

        let run = Run {
            source: Arc::clone(&self.source),
            policy: self.policy.clone(),
            output_dir: self.output_dir.clone(),
            lookback_days: self.lookback_days,
            step_days: self.step_days,
            events: self.events.clone(),
            cancel,
            query: query.to_string(),
        };
        let events = self.events.clone();
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            // Worker boundary: nothing escapes as a panic or Err, and the
            // terminal event fires exactly once on every path.
            let status = match AssertUnwindSafe(run.execute()).catch_unwind().await {
                Ok(status) => status,
                Err(_) => {
                    error!("export run panicked; reporting failure");
                    let _ = events.send(WorkerEvent::Log(
                        "Internal error; run aborted".to_string(),
                    ));
                    RunStatus::Failed
                }
            };

            running.store(false, Ordering::SeqCst);
            let _ = events.send(WorkerEvent::Finished(status));
        });

        true
    }

    /// Request cooperative cancellation of the active run, if any.
    pub fn cancel(&self) {
        let slot = self
            .current_cancel
            .lock()
            .expect("cancel handle lock poisoned");
        if let Some(cancel) = slot.as_ref() {
            info!("cancellation requested");
            cancel.cancel();
        }
    }

    fn send(&self, event: WorkerEvent) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.events.send(event);
    }
}

/// State owned by one spawned run.
struct Run {
    source: Arc<dyn VacancySource>,
    policy: FetchPolicy,
    output_dir: PathBuf,
    lookback_days: i64,
    step_days: i64,
    events: UnboundedSender<WorkerEvent>,
    cancel: SharedCancel,
    query: String,
}

impl Run {
    async fn execute(&self) -> RunStatus {
        let windows = planner::plan_windows(Utc::now(), self.lookback_days, self.step_days);
        let total = windows.len();
        let mut progress = RunProgress::new(total);
        let mut collected: Vec<Vacancy> = Vec::new();

        self.send(WorkerEvent::Progress(progress.percent()));

        for (index, window) in windows.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return self.cancelled();
            }

            self.log(format!("Fetching period: {window}"));
            let items = fetch_window(
                self.source.as_ref(),
                &self.query,
                window,
                &self.policy,
                &self.cancel,
            )
            .await;
            self.log(format!("Vacancies found: {}", items.len()));
            collected.extend(items);
            self.send(WorkerEvent::Progress(progress.advance()));

            let last = index + 1 == total;
            if !last && !self.pause_between_windows().await {
                return self.cancelled();
            }
        }

        // A cancellation during the final window's fetch has no later
        // boundary to surface at, so it is checked here.
        if self.cancel.is_cancelled() {
            return self.cancelled();
        }

        if collected.is_empty() {
            self.log("No matching vacancies found".to_string());
            return RunStatus::Completed;
        }

        self.log(format!("Total vacancies collected: {}", collected.len()));

        let path = export::workbook_path(&self.output_dir, &self.query);
        match export::write_workbook(&collected, &path) {
            Ok(()) => {
                self.log(format!("File saved: {}", path.display()));
            }
            Err(err) => {
                // Data loss is the visible consequence, not a crash: the
                // run still completes after reporting the failure.
                error!(error = %err, path = %path.display(), "export failed");
                self.log(format!("Failed to save file: {err}"));
            }
        }

        RunStatus::Completed
    }

    /// Sleep between windows, racing cancellation. Returns false when the
    /// run was cancelled during the pause.
    async fn pause_between_windows(&self) -> bool {
        if self.policy.window_delay.is_zero() {
            return !self.cancel.is_cancelled();
        }

        tokio::select! {
            _ = tokio::time::sleep(self.policy.window_delay) => true,
            _ = self.cancel.cancelled() => false,
        }
    }

    fn cancelled(&self) -> RunStatus {
        info!(query = %self.query, "run cancelled");
        self.log("Run cancelled".to_string());
        RunStatus::Cancelled
    }

    fn log(&self, line: String) {
        let _ = self.events.send(WorkerEvent::Log(line));
    }

    fn send(&self, event: WorkerEvent) {
        let _ = self.events.send(event);
    }
}
