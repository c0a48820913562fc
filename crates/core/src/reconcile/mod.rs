//! Reconciliation of catalog entries with provider search results.
//!
//! The output of every search is a list of [`FormattedResponse`] records,
//! one per canonical catalog ID, each carrying the provider connectors that
//! were matched to it.

mod config;
mod engine;
mod merge;
mod types;

pub use config::EngineConfig;
pub use engine::{ReconcileError, ReconciliationEngine};
pub use merge::{format_search, search_compare};
pub use types::{Connector, FormattedResponse, SearchMatch};
