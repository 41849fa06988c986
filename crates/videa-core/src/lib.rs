pub mod app_config;
pub mod config;
pub mod model;
pub mod region;
pub mod retry;
pub mod text;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use model::{
    AuthorStats, ChannelProfile, ChannelStatistics, ContentType, IdeaRequest, Platform,
    TrendAnalysis, TrendSummary, TrendingVideo, VideoFormat, VideoIdea, VideoStats,
};
pub use region::{Region, GLOBAL_REGIONS};
pub use retry::RetryPolicy;
pub use text::strip_code_fences;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
