//! Sequential walk over the catalog ID space.

mod orchestrator;

pub use orchestrator::{CrawlConfig, CrawlError, CrawlOrchestrator};
