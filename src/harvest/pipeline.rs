//! Scrape orchestration.
//!
//! [`HarvestPipeline`] runs a scrape in three steps:
//! 1. **Generate** the window URLs (the only step whose errors reach the caller)
//! 2. **Fetch/parse**: one task per window behind the admission gate; the
//!    pipeline waits for every task, then closes the record channel
//! 3. **Aggregate**: waits for the aggregator to drain the channel and hand
//!    back the finished [`Index`]
//!
//! The snapshot is returned only after both waits complete.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::config::ScrapeConfig;
use crate::executor::{FetchExecutor, Window, WindowOutcome, WindowStatus};
use crate::fetch::HttpFetcher;
use crate::harvest::aggregate::Aggregator;
use crate::harvest::parse::InvalidRecordPolicy;
use crate::harvest::progress::{LogProgress, NoProgress, ProgressReporter};
use crate::harvest::windows::{TimeParseError, WindowGenerator};
use crate::model::Index;
use crate::traits::{FetchError, IndexFetcher};

// ============================================================================
// Results
// ============================================================================

/// Counters and timings for one scrape.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScrapeStats {
    pub windows: usize,
    pub complete_windows: usize,
    pub truncated_windows: usize,
    pub failed_windows: usize,
    pub cancelled_windows: usize,

    /// Records handed to the aggregator
    pub records: usize,

    /// Invalid lines dropped under the skip policy
    pub skipped_records: usize,

    /// Distinct module paths in the snapshot
    pub paths: usize,

    pub fetch_duration_ms: u64,
    pub aggregate_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Snapshot plus the per-window outcomes that produced it.
#[derive(Debug)]
pub struct ScrapeReport {
    pub index: Index,

    /// One entry per window, ordered by ordinal
    pub outcomes: Vec<WindowOutcome>,

    pub stats: ScrapeStats,
}

impl ScrapeReport {
    /// `true` when every window's full response made it into the index.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| !o.is_partial())
    }

    /// Windows that were truncated, failed or cancelled.
    pub fn failures(&self) -> impl Iterator<Item = &WindowOutcome> {
        self.outcomes.iter().filter(|o| o.is_partial())
    }

    pub fn into_index(self) -> Index {
        self.index
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// `start` or `end` was not a valid timestamp
    #[error(transparent)]
    Time(#[from] TimeParseError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client unavailable: {0}")]
    Client(FetchError),

    /// The aggregation task panicked or was aborted
    #[error("Aggregation failed: {0}")]
    Aggregator(String),
}

// ============================================================================
// Pipeline
// ============================================================================

/// Concurrent fetch-parse-aggregate scraper over an [`IndexFetcher`].
///
/// # Example
///
/// ```ignore
/// use index_harvester::harvest::HarvestPipeline;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let report = HarvestPipeline::with_defaults()?
///         .with_max_workers(20)
///         .scrape(Some("2024-01-01T00:00:00Z"), None)
///         .await?;
///     println!("{} modules, complete: {}", report.index.len(), report.is_complete());
///     Ok(())
/// }
/// ```
pub struct HarvestPipeline<F>
where
    F: IndexFetcher,
{
    fetcher: Arc<F>,
    config: ScrapeConfig,

    /// Overrides the reporter implied by `config.report_progress`
    progress: Option<Arc<dyn ProgressReporter>>,

    cancel: CancellationToken,

    /// Bound on the whole fetch phase (default: none)
    deadline: Option<Duration>,
}

impl HarvestPipeline<HttpFetcher> {
    /// Pipeline against the public index with default settings.
    pub fn with_defaults() -> Result<Self, PipelineError> {
        Self::from_config(ScrapeConfig::default())
    }

    /// Builds an HTTP-backed pipeline, applying the config's request timeout.
    pub fn from_config(config: ScrapeConfig) -> Result<Self, PipelineError> {
        let fetcher =
            HttpFetcher::with_timeout(config.request_timeout()).map_err(PipelineError::Client)?;
        Ok(Self::new(fetcher).with_config(config))
    }
}

impl<F> HarvestPipeline<F>
where
    F: IndexFetcher + 'static,
{
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config: ScrapeConfig::default(),
            progress: None,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Replaces the whole configuration.
    ///
    /// The request timeout only applies to fetchers built by
    /// [`from_config`](HarvestPipeline::from_config).
    pub fn with_config(mut self, config: ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.config.max_workers = max_workers;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    pub fn with_invalid_record_policy(mut self, policy: InvalidRecordPolicy) -> Self {
        self.config.invalid_record_policy = policy;
        self
    }

    pub fn with_progress<P>(mut self, progress: P) -> Self
    where
        P: ProgressReporter + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Cancelling `token` stops admitting windows and aborts in-flight fetches.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Cancels the fetch phase once `deadline` has elapsed.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn generator(&self) -> WindowGenerator {
        WindowGenerator::new(self.config.base_url.clone(), self.config.epoch.clone())
    }

    /// Scrapes every window between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Fails before any request is sent if a boundary is not a valid
    /// timestamp or, with valid boundaries, if the configuration is invalid.
    /// Once fetching starts the scrape always succeeds; inspect
    /// [`ScrapeReport::outcomes`] for windows that contributed nothing or
    /// only part of their response.
    #[instrument(skip(self))]
    pub async fn scrape(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ScrapeReport, PipelineError> {
        let urls = self.generator().generate(start, end)?;
        self.fetch_and_parse(urls).await
    }

    /// Fetches and aggregates an explicit list of window URLs.
    #[instrument(skip(self, urls), fields(windows = urls.len()))]
    pub async fn fetch_and_parse(&self, urls: Vec<String>) -> Result<ScrapeReport, PipelineError> {
        self.config.validate().map_err(PipelineError::InvalidConfig)?;

        let started = Instant::now();
        let total = urls.len();
        let progress = self.progress_reporter();
        let cancel = self.cancel.child_token();
        let timer = self.deadline.map(|deadline| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!(deadline_ms = deadline.as_millis() as u64, "Scrape deadline reached");
                cancel.cancel();
            })
        });

        info!(
            windows = total,
            max_workers = self.config.max_workers,
            "Starting scrape"
        );

        let executor = FetchExecutor::new(Arc::clone(&self.fetcher), self.config.max_workers)
            .with_policy(self.config.invalid_record_policy);
        let (sink, aggregator) = Aggregator::spawn(self.config.channel_capacity);

        // ====================================================================
        // Fetch/parse fan-out
        // ====================================================================

        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(total);
        for (idx, url) in urls.into_iter().enumerate() {
            let window = Window {
                url,
                ordinal: idx + 1,
                total,
            };
            pending.insert(window.ordinal, window.url.clone());

            let executor = executor.clone();
            let sink = sink.clone();
            let progress = Arc::clone(&progress);
            let cancel = cancel.clone();
            tasks.spawn(async move { executor.execute(window, sink, progress, cancel).await });
        }
        // Only the tasks hold senders now, so the channel closes when the last one ends.
        drop(sink);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    progress.window_finished(&outcome);
                    pending.remove(&outcome.ordinal);
                    outcomes.push(outcome);
                }
                Err(e) => warn!(error = %e, "Fetch task did not complete"),
            }
        }
        // Windows whose task panicked never reported an outcome.
        for (ordinal, url) in pending {
            outcomes.push(WindowOutcome {
                url,
                ordinal,
                records: 0,
                skipped: 0,
                status: WindowStatus::Failed {
                    reason: "fetch task panicked".to_string(),
                },
            });
        }
        outcomes.sort_by_key(|o| o.ordinal);

        if let Some(timer) = timer {
            timer.abort();
        }
        let fetch_duration_ms = started.elapsed().as_millis() as u64;

        // ====================================================================
        // Aggregation barrier
        // ====================================================================

        let aggregate_started = Instant::now();
        let index = aggregator
            .await
            .map_err(|e| PipelineError::Aggregator(e.to_string()))?;
        progress.done();

        let mut stats = summarize(&outcomes);
        stats.paths = index.len();
        stats.fetch_duration_ms = fetch_duration_ms;
        stats.aggregate_duration_ms = aggregate_started.elapsed().as_millis() as u64;
        stats.total_duration_ms = started.elapsed().as_millis() as u64;

        info!(
            windows = stats.windows,
            records = stats.records,
            paths = stats.paths,
            truncated = stats.truncated_windows,
            failed = stats.failed_windows,
            cancelled = stats.cancelled_windows,
            duration_ms = stats.total_duration_ms,
            "Scrape completed"
        );

        Ok(ScrapeReport {
            index,
            outcomes,
            stats,
        })
    }

    fn progress_reporter(&self) -> Arc<dyn ProgressReporter> {
        match &self.progress {
            Some(progress) => Arc::clone(progress),
            None if self.config.report_progress => Arc::new(LogProgress),
            None => Arc::new(NoProgress),
        }
    }
}

fn summarize(outcomes: &[WindowOutcome]) -> ScrapeStats {
    let mut stats = ScrapeStats {
        windows: outcomes.len(),
        ..ScrapeStats::default()
    };
    for outcome in outcomes {
        stats.records += outcome.records;
        stats.skipped_records += outcome.skipped;
        match outcome.status {
            WindowStatus::Complete => stats.complete_windows += 1,
            WindowStatus::Truncated { .. } => stats.truncated_windows += 1,
            WindowStatus::Failed { .. } => stats.failed_windows += 1,
            WindowStatus::Cancelled => stats.cancelled_windows += 1,
        }
    }
    stats
}

// ============================================================================
// Convenience entry points
// ============================================================================

/// Scrapes the public index and returns only the snapshot.
///
/// Empty or missing boundaries default to the index epoch and the current
/// time. Failed windows are not reported; use [`HarvestPipeline::scrape`]
/// for per-window outcomes.
pub async fn scrape(
    start: Option<&str>,
    end: Option<&str>,
    max_workers: usize,
    report_progress: bool,
) -> Result<Index, PipelineError> {
    let config = ScrapeConfig {
        max_workers,
        report_progress,
        ..ScrapeConfig::default()
    };
    let report = HarvestPipeline::from_config(config)?.scrape(start, end).await?;
    Ok(report.into_index())
}

/// Fetches and aggregates the given window URLs over HTTP.
pub async fn fetch_and_parse(
    urls: Vec<String>,
    max_workers: usize,
    report_progress: bool,
) -> Result<Index, PipelineError> {
    let config = ScrapeConfig {
        max_workers,
        report_progress,
        ..ScrapeConfig::default()
    };
    let report = HarvestPipeline::from_config(config)?
        .fetch_and_parse(urls)
        .await?;
    Ok(report.into_index())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// Serves canned bodies keyed by the `since` parameter.
    struct MockFetcher {
        bodies: HashMap<String, Result<String, u16>>,
    }

    impl MockFetcher {
        fn new(entries: &[(&str, Result<&str, u16>)]) -> Self {
            Self {
                bodies: entries
                    .iter()
                    .map(|&(since, body)| (since.to_string(), body.map(str::to_string)))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl IndexFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let since = url.split_once("?since=").map(|(_, s)| s).unwrap_or_default();
            match self.bodies.get(since) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                None => Ok(String::new()),
            }
        }
    }

    /// Never answers; only cancellation ends its fetches.
    struct HangingFetcher;

    #[async_trait]
    impl IndexFetcher for HangingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            std::future::pending().await
        }
    }

    const A1: &str =
        r#"{"Path":"example.com/a","Version":"v1.0.0","Timestamp":"2023-01-01T00:00:00Z"}"#;
    const A2: &str =
        r#"{"Path":"example.com/a","Version":"v1.1.0","Timestamp":"2023-02-01T00:00:00Z"}"#;

    #[tokio::test]
    async fn test_scrape_merges_windows() {
        let fetcher = MockFetcher::new(&[
            ("2023-01-01T00:00:00Z", Ok(A1)),
            ("2023-01-01T12:00:00Z", Ok(A2)),
        ]);
        let report = HarvestPipeline::new(fetcher)
            .with_max_workers(2)
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-02T00:00:00Z"))
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.stats.windows, 2);
        assert_eq!(report.stats.records, 2);
        let versions: Vec<_> = report
            .index
            .get("example.com/a")
            .unwrap()
            .versions
            .iter()
            .map(|v| v.version.as_str())
            .collect();
        assert_eq!(versions.len(), 2);
        assert!(versions.contains(&"v1.0.0"));
        assert!(versions.contains(&"v1.1.0"));
    }

    #[tokio::test]
    async fn test_time_error_aborts_before_fetch() {
        let err = HarvestPipeline::new(HangingFetcher)
            .scrape(Some("not-a-time"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Time(_)));
    }

    #[tokio::test]
    async fn test_zero_workers_rejected() {
        let err = HarvestPipeline::new(HangingFetcher)
            .with_max_workers(0)
            .fetch_and_parse(vec!["http://localhost/index".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_failures_are_reported_not_raised() {
        let fetcher = MockFetcher::new(&[
            ("2023-01-01T00:00:00Z", Ok(A1)),
            ("2023-01-01T12:00:00Z", Err(500)),
        ]);
        let report = HarvestPipeline::new(fetcher)
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-02T00:00:00Z"))
            .await
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.stats.failed_windows, 1);
        let failed: Vec<_> = report.failures().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].ordinal, 2);
        assert_eq!(report.index.version_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_range_yields_empty_index() {
        let report = HarvestPipeline::new(HangingFetcher)
            .scrape(Some("2023-01-02T00:00:00Z"), Some("2023-01-01T00:00:00Z"))
            .await
            .unwrap();
        assert!(report.index.is_empty());
        assert!(report.outcomes.is_empty());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_small_buffer_loses_nothing() {
        let body = (0..50)
            .map(|i| {
                format!(
                    r#"{{"Path":"example.com/m{i}","Version":"v1.0.0","Timestamp":"2023-01-01T00:00:00Z"}}"#
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let fetcher = MockFetcher::new(&[
            ("2023-01-01T00:00:00Z", Ok(body.as_str())),
            ("2023-01-01T12:00:00Z", Ok(body.as_str())),
        ]);
        let report = HarvestPipeline::new(fetcher)
            .with_channel_capacity(1)
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-02T00:00:00Z"))
            .await
            .unwrap();

        assert_eq!(report.index.len(), 50);
        assert_eq!(report.index.version_count(), 100);
    }

    #[tokio::test]
    async fn test_deadline_cancels_hung_fetches() {
        let report = HarvestPipeline::new(HangingFetcher)
            .with_max_workers(1)
            .with_deadline(Duration::from_millis(50))
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-03T00:00:00Z"))
            .await
            .unwrap();

        assert_eq!(report.stats.windows, 4);
        assert_eq!(report.stats.cancelled_windows, 4);
        assert!(report.index.is_empty());
    }

    /// Records every admission it is told about.
    #[derive(Clone, Default)]
    struct RecordingProgress {
        admitted: Arc<Mutex<Vec<(usize, usize)>>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn window_admitted(&self, ordinal: usize, total: usize, _url: &str) {
            self.admitted.lock().unwrap().push((ordinal, total));
        }
    }

    /// In-memory sink for formatted log lines.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Answers the windows it knows and never answers the rest.
    struct PartialFetcher {
        inner: MockFetcher,
    }

    #[async_trait]
    impl IndexFetcher for PartialFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let since = url.split_once("?since=").map(|(_, s)| s).unwrap_or_default();
            if self.inner.bodies.contains_key(since) {
                self.inner.fetch(url).await
            } else {
                std::future::pending().await
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_progress_reports_each_admission() {
        let progress = RecordingProgress::default();
        let report = HarvestPipeline::new(MockFetcher::new(&[]))
            .with_max_workers(2)
            .with_progress(progress.clone())
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-03T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(report.stats.windows, 4);

        let mut admitted = progress.admitted.lock().unwrap().clone();
        admitted.sort();
        assert_eq!(admitted, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[tokio::test]
    async fn test_report_progress_logs_admissions() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = ScrapeConfig {
            report_progress: true,
            ..ScrapeConfig::default()
        };
        let pipeline = HarvestPipeline::new(MockFetcher::new(&[])).with_config(config);
        assert!(pipeline.config().report_progress);
        pipeline
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-02T00:00:00Z"))
            .await
            .unwrap();

        let output = logs.contents();
        assert!(output.contains("Fetching window 1/2"), "{output}");
        assert!(output.contains("Fetching window 2/2"), "{output}");
    }

    #[tokio::test]
    async fn test_progress_silent_by_default() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let pipeline = HarvestPipeline::new(MockFetcher::new(&[]));
        assert!(!pipeline.config().report_progress);
        pipeline
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-02T00:00:00Z"))
            .await
            .unwrap();

        assert!(!logs.contents().contains("Fetching window"));
    }

    #[tokio::test]
    async fn test_caller_cancellation_keeps_finished_windows() {
        let fetcher = PartialFetcher {
            inner: MockFetcher::new(&[
                ("2023-01-01T00:00:00Z", Ok(A1)),
                ("2023-01-01T12:00:00Z", Ok(A2)),
            ]),
        };
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                token.cancel();
            })
        };

        let report = HarvestPipeline::new(fetcher)
            .with_max_workers(4)
            .with_cancellation(token)
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-03T00:00:00Z"))
            .await
            .unwrap();
        canceller.await.unwrap();

        let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![
                WindowStatus::Complete,
                WindowStatus::Complete,
                WindowStatus::Cancelled,
                WindowStatus::Cancelled,
            ]
        );
        assert!(!report.is_complete());
        assert_eq!(report.stats.complete_windows, 2);
        assert_eq!(report.stats.cancelled_windows, 2);
        assert_eq!(report.failures().count(), 2);
        assert_eq!(report.index.get("example.com/a").unwrap().versions.len(), 2);
    }

    #[tokio::test]
    async fn test_time_error_takes_precedence_over_config_error() {
        let err = HarvestPipeline::new(HangingFetcher)
            .with_max_workers(0)
            .scrape(Some("not-a-time"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Time(_)));

        let err = HarvestPipeline::new(HangingFetcher)
            .with_max_workers(0)
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-02T00:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_skip_policy_through_pipeline() {
        let body = format!("{A1}\n{{broken\n{A2}\n");
        let fetcher = MockFetcher::new(&[("2023-01-01T00:00:00Z", Ok(body.as_str()))]);
        let report = HarvestPipeline::new(fetcher)
            .with_invalid_record_policy(InvalidRecordPolicy::Skip)
            .scrape(Some("2023-01-01T00:00:00Z"), Some("2023-01-01T12:00:00Z"))
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.stats.skipped_records, 1);
        assert_eq!(report.index.version_count(), 2);
    }
}
