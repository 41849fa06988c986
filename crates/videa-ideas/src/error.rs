use thiserror::Error;

/// Errors surfaced by idea synthesis.
#[derive(Debug, Error)]
pub enum IdeaError {
    /// Trend resolution for the requested region failed.
    #[error(transparent)]
    Trend(#[from] videa_trends::TrendError),

    /// Both generation paths were exhausted. The message is fixed; raw
    /// model/parse errors never reach the caller.
    #[error("Failed to generate a video idea. Please try again.")]
    GenerationFailed,
}
