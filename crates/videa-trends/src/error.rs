use thiserror::Error;

/// Errors surfaced by trend aggregation.
///
/// Summarization is infallible by contract: it degrades to a placeholder
/// summary instead of erroring.
#[derive(Debug, Error)]
pub enum TrendError {
    /// The upstream trending fetch failed.
    #[error(transparent)]
    Youtube(#[from] videa_youtube::YoutubeError),

    /// Every region in the global fan-out failed.
    #[error("failed to fetch global trending data")]
    NoTrendingData,
}
