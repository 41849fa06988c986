//! Trend ingestion: multi-region aggregation and LLM summarization.
//!
//! [`aggregate_trending`] turns a region selector into a bounded,
//! de-duplicated, diversified top list; [`summarize_trends`] reduces a
//! trending set into a [`videa_core::TrendSummary`]. Both consult an
//! explicitly passed [`TrendCache`]; there is no ambient module state.

mod aggregator;
mod cache;
mod error;
mod summarizer;

pub use aggregator::aggregate_trending;
pub use cache::TrendCache;
pub use error::TrendError;
pub use summarizer::summarize_trends;
