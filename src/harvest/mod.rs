//! Harvest module - the concurrent scrape pipeline.
//!
//! - **Windows**: time-window URL generation via [`WindowGenerator`]
//! - **Parse**: newline-delimited record parsing via [`parse_body`]
//! - **Aggregate**: single-owner index aggregation via [`Aggregator`]
//! - **Progress**: pluggable reporting via [`ProgressReporter`]
//! - **Pipeline**: the orchestrator via [`HarvestPipeline`]

pub mod aggregate;
pub mod parse;
pub mod pipeline;
pub mod progress;
pub mod windows;

// Re-export commonly used types
pub use aggregate::{AggregateError, Aggregator, AggregatorHandle};
pub use parse::{parse_body, parse_line, InvalidRecordPolicy, ParsedBody, MIN_PATH_LEN};
pub use pipeline::{fetch_and_parse, scrape, HarvestPipeline, PipelineError, ScrapeReport, ScrapeStats};
pub use progress::{BarProgress, LogProgress, NoProgress, ProgressReporter};
pub use windows::{
    format_since, generate_urls, TimeParseError, WindowGenerator, DEFAULT_BASE_URL, INDEX_EPOCH,
    WINDOW_STEP_SECS,
};
