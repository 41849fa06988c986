//! Typed client for the YouTube Data API v3.
//!
//! Covers the five endpoints the pipeline consumes (popular-by-region,
//! video details, channel lookup, channel search, playlist items) and the
//! enrichment choreography that turns raw API resources into
//! [`videa_core::TrendingVideo`] values.

mod client;
mod error;
mod recency;
mod types;

pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use recency::{days_since, recency_label};
pub use types::ChannelSearchResult;
