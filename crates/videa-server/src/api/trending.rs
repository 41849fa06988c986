use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use videa_core::{Region, TrendingVideo};
use videa_trends::aggregate_trending;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct TrendingQuery {
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TrendingMetadata {
    pub fetched_at: DateTime<Utc>,
    pub region: String,
    pub total_fetched: usize,
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct TrendingResponse {
    pub videos: Vec<TrendingVideo>,
    pub metadata: TrendingMetadata,
}

/// `GET /api/trending?region=`: the bounded, diversified trending list for
/// a region (or the synthetic GLOBAL aggregate). Codes outside the catalog
/// coerce to US before anything reaches the upstream API.
pub(super) async fn region_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let region = Region::parse(query.region.as_deref().unwrap_or("US"));

    let videos = aggregate_trending(&state.youtube, &state.trend_cache, region)
        .await
        .map_err(|e| {
            tracing::error!(region = %region, error = %e, "trending fetch failed");
            ApiError::internal("Failed to fetch trending videos")
        })?;

    let metadata = TrendingMetadata {
        fetched_at: Utc::now(),
        region: region.as_str().to_owned(),
        total_fetched: videos.len(),
        source: "YouTube Data API",
    };

    Ok(Json(TrendingResponse { videos, metadata }))
}
