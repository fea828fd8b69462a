//! Scrape configuration.
//!
//! Every field has a default, so a partial document (or none at all) yields a
//! usable configuration.

use crate::harvest::parse::InvalidRecordPolicy;
use crate::harvest::windows::{DEFAULT_BASE_URL, INDEX_EPOCH};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Index service endpoint; windows append `?since=<timestamp>`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Start of the scrape when the caller gives none.
    #[serde(default = "default_epoch")]
    pub epoch: String,

    /// Maximum number of windows fetched at once.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Records buffered between fetch tasks and the aggregator.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Per-request deadline in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Log each window as it is admitted.
    #[serde(default)]
    pub report_progress: bool,

    #[serde(default)]
    pub invalid_record_policy: InvalidRecordPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            epoch: default_epoch(),
            max_workers: default_max_workers(),
            channel_capacity: default_channel_capacity(),
            request_timeout_secs: None,
            report_progress: false,
            invalid_record_policy: InvalidRecordPolicy::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Checks values that would stall or panic the pipeline.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_workers == 0 {
            return Err("max_workers must be at least 1".to_string());
        }
        if self.channel_capacity == 0 {
            return Err("channel_capacity must be at least 1".to_string());
        }
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_epoch() -> String {
    INDEX_EPOCH.to_string()
}

fn default_max_workers() -> usize {
    10
}

fn default_channel_capacity() -> usize {
    2048
}
