use crate::harvest::aggregate::AggregatorHandle;
use crate::harvest::parse::{parse_body, InvalidRecordPolicy};
use crate::harvest::progress::ProgressReporter;
use crate::traits::{FetchError, IndexFetcher};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// One request of a scrape.
#[derive(Debug, Clone)]
pub struct Window {
    pub url: String,
    /// 1-based position in the generated sequence.
    pub ordinal: usize,
    pub total: usize,
}

/// How a single window ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowStatus {
    /// Every line of the response was accepted (or skipped under `Skip`).
    Complete,
    /// Parsing stopped at an invalid line; the rest of the body was dropped.
    Truncated { line: usize, reason: String },
    /// No body was obtained.
    Failed { reason: String },
    /// The scrape was cancelled before this window's body arrived.
    Cancelled,
}

/// Tagged result of one fetch task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowOutcome {
    pub url: String,
    pub ordinal: usize,
    /// Records forwarded to the aggregator.
    pub records: usize,
    /// Invalid lines dropped under [`InvalidRecordPolicy::Skip`].
    pub skipped: usize,
    pub status: WindowStatus,
}

impl WindowOutcome {
    fn new(window: &Window, status: WindowStatus) -> Self {
        Self {
            url: window.url.clone(),
            ordinal: window.ordinal,
            records: 0,
            skipped: 0,
            status,
        }
    }

    /// `true` unless the window's full body was processed.
    pub fn is_partial(&self) -> bool {
        self.status != WindowStatus::Complete
    }
}

/// Runs fetch tasks behind a counting admission gate.
///
/// At most `max_workers` windows hold a permit at once. A permit is held from
/// the start of the request until the window's records have been handed to
/// the aggregator.
pub struct FetchExecutor<F> {
    fetcher: Arc<F>,
    semaphore: Arc<Semaphore>,
    policy: InvalidRecordPolicy,
}

impl<F> Clone for FetchExecutor<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            semaphore: Arc::clone(&self.semaphore),
            policy: self.policy,
        }
    }
}

impl<F> FetchExecutor<F>
where
    F: IndexFetcher + 'static,
{
    pub fn new(fetcher: Arc<F>, max_workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(max_workers)),
            policy: InvalidRecordPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: InvalidRecordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetches, parses and forwards one window.
    ///
    /// Never fails: fetch and record errors are folded into the returned
    /// [`WindowOutcome`].
    #[instrument(skip(self, window, sink, progress, cancel), fields(ordinal = window.ordinal))]
    pub async fn execute(
        &self,
        window: Window,
        sink: AggregatorHandle,
        progress: Arc<dyn ProgressReporter>,
        cancel: CancellationToken,
    ) -> WindowOutcome {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return WindowOutcome::new(&window, WindowStatus::Cancelled);
            }
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit,
        };
        let _permit = match permit {
            Ok(permit) => permit,
            Err(e) => {
                let err = FetchError::Admission(e.to_string());
                return WindowOutcome::new(&window, WindowStatus::Failed { reason: err.to_string() });
            }
        };

        progress.window_admitted(window.ordinal, window.total, &window.url);

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %window.url, "Fetch cancelled");
                return WindowOutcome::new(&window, WindowStatus::Cancelled);
            }
            fetched = self.fetcher.fetch(&window.url) => fetched,
        };

        let body = match fetched {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %window.url, error = %e, "Window fetch failed");
                return WindowOutcome::new(&window, WindowStatus::Failed { reason: e.to_string() });
            }
        };

        let parsed = parse_body(&body, self.policy);
        let mut outcome = WindowOutcome::new(&window, WindowStatus::Complete);
        outcome.skipped = parsed.skipped;

        for record in parsed.records {
            if let Err(e) = sink.submit(record).await {
                warn!(url = %window.url, error = %e, "Dropping remaining records");
                outcome.status = WindowStatus::Failed { reason: e.to_string() };
                return outcome;
            }
            outcome.records += 1;
        }

        if let Some(err) = parsed.abandoned_at {
            warn!(url = %window.url, line = err.line(), error = %err, "Abandoning rest of response");
            outcome.status = WindowStatus::Truncated {
                line: err.line(),
                reason: err.to_string(),
            };
        }

        debug!(
            url = %window.url,
            records = outcome.records,
            skipped = outcome.skipped,
            "Window processed"
        );
        outcome
    }
}
