//! Shared domain model.
//!
//! Every type serializes in camelCase, the wire format the UI tier and the
//! persisted rows both speak. `TrendingVideo` stats are numeric strings as
//! returned by the platform API; they are parsed to numbers only at ranking
//! time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::region::Region;

// ---------------------------------------------------------------------------
// Trending items
// ---------------------------------------------------------------------------

/// Aggregate statistics for a video's author channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub subscribers: String,
    pub total_views: String,
}

impl AuthorStats {
    /// Degraded stats used when a per-item channel lookup fails.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            subscribers: "0".to_owned(),
            total_views: "0".to_owned(),
        }
    }
}

/// Per-video engagement counters, kept as the numeric strings the platform
/// API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    pub views: String,
    pub likes: String,
    pub comments: String,
}

impl VideoStats {
    /// Parsed view count; unparseable strings count as zero.
    #[must_use]
    pub fn view_count(&self) -> u64 {
        self.views.parse().unwrap_or(0)
    }

    /// Composite engagement score: views + likes + comments.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.view_count()
            + self.likes.parse::<u64>().unwrap_or(0)
            + self.comments.parse::<u64>().unwrap_or(0)
    }
}

/// One trending video, enriched with its author's channel statistics.
///
/// Immutable once fetched; lives for one fetch cycle and is cached
/// externally by region + TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_stats: AuthorStats,
    pub stats: VideoStats,
    pub tags: Vec<String>,
    pub category: String,
    pub published_text: String,
}

// ---------------------------------------------------------------------------
// Trend summary
// ---------------------------------------------------------------------------

/// Structured distillation of a trending-video set.
///
/// All eight fields are required: a summarizer response missing any of them
/// fails deserialization and is replaced wholesale by [`TrendSummary::placeholder`],
/// never partially accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub themes: Vec<String>,
    pub content_types: Vec<String>,
    pub video_formats: Vec<String>,
    pub trending_topics: Vec<String>,
    pub engagement_insights: Vec<String>,
    pub top_categories: Vec<String>,
    pub title_patterns: Vec<String>,
    pub popular_tags: Vec<String>,
}

impl TrendSummary {
    /// Degraded summary returned when the analysis call fails or its output
    /// violates the JSON contract. Synthesis must always have a usable
    /// summary to work from.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            themes: vec!["Unable to analyze themes".to_owned()],
            content_types: vec!["Unable to analyze content types".to_owned()],
            video_formats: vec!["Unable to analyze formats".to_owned()],
            trending_topics: vec!["Unable to analyze topics".to_owned()],
            engagement_insights: vec!["Unable to analyze engagement".to_owned()],
            top_categories: vec!["Unable to analyze categories".to_owned()],
            title_patterns: vec!["Unable to analyze patterns".to_owned()],
            popular_tags: vec!["Unable to analyze tags".to_owned()],
        }
    }
}

// ---------------------------------------------------------------------------
// Idea request
// ---------------------------------------------------------------------------

/// Target publishing platform for a generated idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "tiktok")]
    Tiktok,
    #[serde(rename = "youtube")]
    Youtube,
    #[serde(rename = "instagram")]
    Instagram,
    #[serde(rename = "youtube-shorts")]
    YoutubeShorts,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Tiktok => write!(f, "TikTok"),
            Platform::Youtube => write!(f, "YouTube"),
            Platform::Instagram => write!(f, "Instagram Reels"),
            Platform::YoutubeShorts => write!(f, "YouTube Shorts"),
        }
    }
}

/// Broad content category for a generated idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Entertainment,
    Educational,
    Tutorial,
    Vlog,
    Challenge,
    Reaction,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Entertainment => write!(f, "entertainment"),
            ContentType::Educational => write!(f, "educational"),
            ContentType::Tutorial => write!(f, "tutorial"),
            ContentType::Vlog => write!(f, "vlog"),
            ContentType::Challenge => write!(f, "challenge"),
            ContentType::Reaction => write!(f, "reaction"),
        }
    }
}

/// User-supplied generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRequest {
    pub niche: String,
    pub platform: Platform,
    pub content_type: ContentType,
    /// 0–100 dial biasing generation toward conservative (low) or
    /// experimental (high) concepts.
    pub virality_factor: u8,
    #[serde(default)]
    pub keywords: Option<String>,
    pub region: Region,
    #[serde(default)]
    pub reference_channels: Option<Vec<String>>,
    #[serde(default)]
    pub feedback: Option<String>,
    /// Serialized JSON of a previously generated idea, present when the
    /// user asks for an improved iteration.
    #[serde(default)]
    pub previous_idea: Option<String>,
}

// ---------------------------------------------------------------------------
// Video idea
// ---------------------------------------------------------------------------

/// Recommended format for executing an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub length: String,
    pub hooks: Vec<String>,
}

impl VideoFormat {
    /// Default used when the generator omits the format.
    #[must_use]
    pub fn default_short_form() -> Self {
        Self {
            kind: "Short form".to_owned(),
            length: "60 seconds".to_owned(),
            hooks: vec![
                "Hook 1".to_owned(),
                "Hook 2".to_owned(),
                "Hook 3".to_owned(),
            ],
        }
    }
}

/// Trend context attached to a generated idea.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    #[serde(default)]
    pub relevant_themes: Vec<String>,
    #[serde(default)]
    pub related_content: Vec<String>,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

/// A generated video idea.
///
/// `id` and `created_at` are always assigned at construction; values the
/// generator emits for them are ignored. Ownership transfers to the idea
/// store on save; unsaved ideas live only in the rolling recent-ideas
/// buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoIdea {
    pub id: Uuid,
    pub title: String,
    pub concept: String,
    pub hashtags: Vec<String>,
    pub virality_score: u8,
    pub virality_justification: String,
    pub monetization_strategy: String,
    pub video_format: VideoFormat,
    pub platform: Platform,
    pub content_type: ContentType,
    pub created_at: DateTime<Utc>,
    pub trend_analysis: TrendAnalysis,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_inspirations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

// ---------------------------------------------------------------------------
// Channel profile
// ---------------------------------------------------------------------------

/// Aggregate counters for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub view_count: String,
    pub subscriber_count: String,
    pub video_count: String,
}

/// A reference channel used as prompt context; never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    pub statistics: ChannelStatistics,
}
