pub mod config;
pub mod executor;
pub mod fetch;
pub mod harvest;
pub mod model;
pub mod traits;

// Re-export common types for convenience
pub use config::*;
pub use executor::*;
pub use fetch::*;
pub use harvest::{
    fetch_and_parse, generate_urls, scrape, HarvestPipeline, InvalidRecordPolicy, PipelineError,
    ScrapeReport, ScrapeStats,
};
pub use model::*;
pub use traits::*;
