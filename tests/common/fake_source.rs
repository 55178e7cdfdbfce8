//! Scripted [`VacancySource`] fake shared by the fetcher and worker tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vacancy_exporter::fetcher::{FetcherError, FetcherResult, VacancySource};
use vacancy_exporter::planner::DateWindow;
use vacancy_exporter::{Vacancy, VacancyPage};

/// One recorded `fetch_page` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub query: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub page: u32,
    pub page_size: u32,
}

type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// Fake source that replays a scripted sequence of responses.
///
/// Responses are consumed globally in call order; once the script is
/// exhausted, further calls return an empty single-page response. An
/// optional hook observes each call index, which lets tests trigger
/// cancellation at an exact point in the run.
pub struct FakeSource {
    script: Mutex<VecDeque<FetcherResult<VacancyPage>>>,
    calls: Mutex<Vec<RecordedCall>>,
    on_call: Mutex<Option<CallHook>>,
}

impl FakeSource {
    pub fn new(script: Vec<FetcherResult<VacancyPage>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            on_call: Mutex::new(None),
        }
    }

    /// Install a hook invoked with the zero-based index of every call.
    pub fn set_call_hook(&self, hook: impl Fn(usize) + Send + Sync + 'static) {
        *self.on_call.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Responses left unconsumed in the script.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl VacancySource for FakeSource {
    async fn fetch_page(
        &self,
        query: &str,
        window: &DateWindow,
        page: u32,
        page_size: u32,
    ) -> FetcherResult<VacancyPage> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                query: query.to_string(),
                window_start: window.start,
                window_end: window.end,
                page,
                page_size,
            });
            calls.len() - 1
        };

        if let Some(hook) = self.on_call.lock().unwrap().as_ref() {
            hook(index);
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(VacancyPage::default()))
    }
}

/// Build `count` distinct vacancies.
pub fn vacancies(count: usize) -> Vec<Vacancy> {
    (0..count)
        .map(|i| Vacancy {
            name: Some(format!("vacancy-{i}")),
            ..Vacancy::default()
        })
        .collect()
}

/// Build one response page with `count` items and the given total page count.
pub fn page(count: usize, pages: u32) -> VacancyPage {
    VacancyPage {
        items: vacancies(count),
        pages,
        page: 0,
        found: count as u64,
    }
}

/// Shorthand for a timeout failure.
pub fn timeout() -> FetcherError {
    FetcherError::Timeout("deadline elapsed".to_string())
}

/// Shorthand for a connection failure.
pub fn connect_failure() -> FetcherError {
    FetcherError::Connect("connection refused".to_string())
}
