use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use videa_core::{ChannelProfile, TrendingVideo};
use videa_youtube::{ChannelSearchResult, YoutubeError};

use super::{ApiError, AppState};

const DEFAULT_SEARCH_RESULTS: u32 = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChannelVideosQuery {
    pub channel_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChannelMetadata {
    pub fetched_at: DateTime<Utc>,
    pub total_fetched: usize,
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChannelVideosResponse {
    pub channel_info: ChannelProfile,
    pub videos: Vec<TrendingVideo>,
    pub metadata: ChannelMetadata,
}

/// `GET /api/channel-videos?channelId=`: channel profile plus its top
/// videos by view count.
pub(super) async fn channel_videos(
    State(state): State<AppState>,
    Query(query): Query<ChannelVideosQuery>,
) -> Result<Json<ChannelVideosResponse>, ApiError> {
    let Some(channel_id) = query.channel_id.filter(|id| !id.trim().is_empty()) else {
        return Err(ApiError::bad_request("Channel ID is required"));
    };

    let (channel_info, videos) = state
        .youtube
        .fetch_channel_videos(&channel_id)
        .await
        .map_err(|e| match e {
            YoutubeError::ChannelNotFound => ApiError::not_found("Channel not found"),
            other => {
                tracing::error!(channel_id = %channel_id, error = %other, "channel fetch failed");
                ApiError::internal("Failed to fetch channel videos")
            }
        })?;

    let metadata = ChannelMetadata {
        fetched_at: Utc::now(),
        total_fetched: videos.len(),
        source: "YouTube Data API",
    };

    Ok(Json(ChannelVideosResponse {
        channel_info,
        videos,
        metadata,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChannelSearchQuery {
    pub query: Option<String>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChannelSearchResponse {
    pub channels: Vec<ChannelSearchResult>,
}

/// `GET /api/channel-search?query=&maxResults=`: creator search.
pub(super) async fn channel_search(
    State(state): State<AppState>,
    Query(query): Query<ChannelSearchQuery>,
) -> Result<Json<ChannelSearchResponse>, ApiError> {
    let Some(search) = query.query.filter(|q| !q.trim().is_empty()) else {
        return Err(ApiError::bad_request("Search query is required"));
    };
    let max_results = query.max_results.unwrap_or(DEFAULT_SEARCH_RESULTS);

    let channels = state
        .youtube
        .search_channels(&search, max_results)
        .await
        .map_err(|e| match e {
            YoutubeError::NoChannelsFound => {
                ApiError::not_found("No channels found matching that name")
            }
            other => {
                tracing::error!(query = %search, error = %other, "channel search failed");
                ApiError::internal("Failed to search for YouTube channel")
            }
        })?;

    Ok(Json(ChannelSearchResponse { channels }))
}
