//! Window generation.
//!
//! The index service is paginated by a `since` timestamp. A scrape covers its
//! time span with one request per fixed-size window, starting at `start` and
//! stepping forward until `end` (exclusive).

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use thiserror::Error;

/// Earliest record published by the public Go module index.
///
/// Starting earlier is allowed but yields no additional data.
pub const INDEX_EPOCH: &str = "2019-04-10T19:08:52.997264Z";

/// Default index service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://index.golang.org/index";

/// Spacing between consecutive windows, in seconds (12 hours).
///
/// Not configurable: a wider step risks skipping records that a single page
/// cannot hold, a narrower one multiplies requests and duplicates.
pub const WINDOW_STEP_SECS: i64 = 12 * 60 * 60;

/// A boundary timestamp could not be parsed as RFC 3339.
#[derive(Error, Debug)]
#[error("Invalid {field} timestamp '{input}': {source}")]
pub struct TimeParseError {
    pub field: &'static str,
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Derives the ordered list of window URLs for a time span.
#[derive(Debug, Clone)]
pub struct WindowGenerator {
    base_url: String,
    epoch: String,
}

impl Default for WindowGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, INDEX_EPOCH)
    }
}

impl WindowGenerator {
    pub fn new(base_url: impl Into<String>, epoch: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            epoch: epoch.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generates window URLs from `start` up to `end`.
    ///
    /// Missing or empty `start` defaults to the configured epoch, missing or
    /// empty `end` to the current time. Returns an empty list when
    /// `start >= end`. Never returns a partial list alongside an error.
    pub fn generate(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<String>, TimeParseError> {
        self.generate_at(start, end, Utc::now())
    }

    /// Same as [`generate`](Self::generate) with an explicit "now".
    pub fn generate_at(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, TimeParseError> {
        let start = match non_empty(start) {
            Some(start) => parse_time("start", start)?,
            None => parse_time("epoch", &self.epoch)?,
        };
        let end = match non_empty(end) {
            Some(end) => parse_time("end", end)?,
            None => now,
        };

        let step = Duration::seconds(WINDOW_STEP_SECS);
        let mut urls = Vec::new();
        let mut since = start;
        while since < end {
            urls.push(self.window_url(since));
            since += step;
        }

        Ok(urls)
    }

    /// URL requesting records published at or after `since`.
    pub fn window_url(&self, since: DateTime<Utc>) -> String {
        format!("{}?since={}", self.base_url, format_since(since))
    }
}

/// Formats `since` as UTC RFC 3339 with trailing zeros of the fraction
/// removed, the shape the index service itself emits.
pub fn format_since(since: DateTime<Utc>) -> String {
    let full = since.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let Some(stamp) = full.strip_suffix('Z') else {
        return full;
    };
    match stamp.split_once('.') {
        Some((seconds, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{seconds}Z")
            } else {
                format!("{seconds}.{fraction}Z")
            }
        }
        None => full,
    }
}

/// Window URLs against the public index with default boundaries.
///
/// See [`WindowGenerator::generate`].
pub fn generate_urls(start: Option<&str>, end: Option<&str>) -> Result<Vec<String>, TimeParseError> {
    WindowGenerator::default().generate(start, end)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_time(field: &'static str, input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    DateTime::parse_from_rfc3339(input)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| TimeParseError {
            field,
            input: input.to_string(),
            source,
        })
}
