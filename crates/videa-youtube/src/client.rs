//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API-key management, rate-limit retries through the
//! shared [`RetryPolicy`], and typed response deserialization. Rate-limit
//! responses (429 and quota-flavored 403) are retried with back-off; other
//! failures propagate immediately.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};

use videa_core::{
    AuthorStats, ChannelProfile, ChannelStatistics, Region, RetryPolicy, TrendingVideo, VideoStats,
};

use crate::error::{is_rate_limited, YoutubeError};
use crate::recency::published_label;
use crate::types::{
    ChannelListResponse, ChannelResource, ChannelSearchResult, PlaylistItemListResponse,
    SearchListResponse, VideoListResponse, VideoResource,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Trending fetch cap: the maximum the API allows per page.
const TRENDING_MAX_RESULTS: &str = "50";

/// Author-stats enrichment runs in batches of this size with a fixed delay
/// between batches, trading latency for rate-limit safety.
const ENRICH_BATCH_SIZE: usize = 5;
const INTER_BATCH_DELAY: Duration = Duration::from_millis(500);

/// A channel's video list is trimmed to its top entries by view count.
const TOP_CHANNEL_VIDEOS: usize = 20;

/// Client for the YouTube Data API v3.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production Data API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("videa/0.1 (trend-ingestion)")
            .build()?;

        // Normalise: the base URL must end with exactly one slash so that
        // Url::join appends the resource instead of replacing the last path
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| YoutubeError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Overrides the retry policy (tests use a zero-delay policy).
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches up to 50 trending videos for `region`, each enriched with its
    /// author's channel statistics and a publish-recency label, ordered by
    /// descending view count.
    ///
    /// A failed per-item enrichment degrades that item to zero-valued author
    /// stats; a failed top-level call fails the whole fetch.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError`] if the popular-videos call fails after
    /// retries or its response cannot be parsed.
    pub async fn fetch_trending(&self, region: Region) -> Result<Vec<TrendingVideo>, YoutubeError> {
        let url = self.build_url(
            "videos",
            &[
                ("part", "snippet,statistics"),
                ("chart", "mostPopular"),
                ("regionCode", region.as_str()),
                ("maxResults", TRENDING_MAX_RESULTS),
            ],
        );
        let response: VideoListResponse = self
            .get_json(&url, &format!("videos(chart=mostPopular,region={region})"))
            .await?;

        tracing::debug!(
            region = %region,
            fetched = response.items.len(),
            "fetched trending videos"
        );

        let mut videos = Vec::with_capacity(response.items.len());
        let batches: Vec<&[VideoResource]> =
            response.items.chunks(ENRICH_BATCH_SIZE).collect();
        let batch_count = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            let enriched =
                futures::future::join_all(batch.iter().map(|video| self.enrich_video(video)))
                    .await;
            videos.extend(enriched);

            if index + 1 < batch_count {
                tokio::time::sleep(INTER_BATCH_DELAY).await;
            }
        }

        // Enrichment join order is not a contract; re-sort before returning.
        videos.sort_by(|a, b| b.stats.view_count().cmp(&a.stats.view_count()));
        Ok(videos)
    }

    /// Fetches a channel profile plus its top videos by view count.
    ///
    /// Resolves the channel's uploads playlist, pulls up to 50 recent
    /// uploads, fetches their details, and keeps the top 20 by views.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::ChannelNotFound`] if the channel id matches
    /// nothing, or [`YoutubeError`] on transport/parse failure.
    pub async fn fetch_channel_videos(
        &self,
        channel_id: &str,
    ) -> Result<(ChannelProfile, Vec<TrendingVideo>), YoutubeError> {
        let channel = self.get_channel_resource(channel_id).await?;
        let profile = channel_profile(&channel);
        let author_stats = author_stats_of(&channel);

        let Some(uploads) = channel
            .content_details
            .as_ref()
            .map(|details| details.related_playlists.uploads.clone())
        else {
            return Ok((profile, Vec::new()));
        };

        let url = self.build_url(
            "playlistItems",
            &[
                ("part", "snippet,contentDetails"),
                ("playlistId", &uploads),
                ("maxResults", "50"),
            ],
        );
        let playlist: PlaylistItemListResponse = self
            .get_json(&url, &format!("playlistItems(channel={channel_id})"))
            .await?;

        let video_ids: Vec<String> = playlist
            .items
            .into_iter()
            .map(|item| item.content_details.video_id)
            .collect();
        if video_ids.is_empty() {
            return Ok((profile, Vec::new()));
        }

        let ids = video_ids.join(",");
        let url = self.build_url("videos", &[("part", "snippet,statistics"), ("id", &ids)]);
        let details: VideoListResponse = self
            .get_json(&url, &format!("videos(channel={channel_id})"))
            .await?;

        let now = Utc::now();
        let mut videos: Vec<TrendingVideo> = details
            .items
            .iter()
            .map(|video| build_trending(video, author_stats.clone(), now))
            .collect();

        videos.sort_by(|a, b| b.stats.view_count().cmp(&a.stats.view_count()));
        videos.truncate(TOP_CHANNEL_VIDEOS);

        Ok((profile, videos))
    }

    /// Looks up one channel profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::ChannelNotFound`] if the id matches nothing.
    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelProfile, YoutubeError> {
        let channel = self.get_channel_resource(channel_id).await?;
        Ok(channel_profile(&channel))
    }

    /// Searches for channels by creator name.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::NoChannelsFound`] when the search result set
    /// is empty; callers surface this as a 404, distinct from transport
    /// failures.
    pub async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelSearchResult>, YoutubeError> {
        let max_results = max_results.to_string();
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "channel"),
                ("maxResults", &max_results),
            ],
        );
        let response: SearchListResponse = self
            .get_json(&url, &format!("search(query={query})"))
            .await?;

        let channels: Vec<ChannelSearchResult> = response
            .items
            .into_iter()
            .filter_map(|item| {
                item.id.channel_id.map(|channel_id| ChannelSearchResult {
                    channel_id,
                    title: item.snippet.title,
                    description: item.snippet.description,
                })
            })
            .collect();

        if channels.is_empty() {
            return Err(YoutubeError::NoChannelsFound);
        }
        Ok(channels)
    }

    /// Converts one popular-list resource into a [`TrendingVideo`], fetching
    /// the author's channel statistics. Enrichment failures degrade to
    /// zero-valued stats rather than dropping the item.
    async fn enrich_video(&self, video: &VideoResource) -> TrendingVideo {
        let author_stats = match self.fetch_author_stats(&video.snippet.channel_id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(
                    video_id = %video.id,
                    channel_id = %video.snippet.channel_id,
                    error = %e,
                    "author stats lookup failed, degrading to zeroed stats"
                );
                AuthorStats::zeroed()
            }
        };
        build_trending(video, author_stats, Utc::now())
    }

    async fn fetch_author_stats(&self, channel_id: &str) -> Result<AuthorStats, YoutubeError> {
        let url = self.build_url("channels", &[("part", "statistics"), ("id", channel_id)]);
        let response: ChannelListResponse = self
            .get_json(&url, &format!("channels(id={channel_id})"))
            .await?;

        let Some(channel) = response.items.first() else {
            return Err(YoutubeError::ChannelNotFound);
        };
        Ok(author_stats_of(channel))
    }

    async fn get_channel_resource(
        &self,
        channel_id: &str,
    ) -> Result<ChannelResource, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[
                ("part", "snippet,statistics,contentDetails"),
                ("id", channel_id),
            ],
        );
        let mut response: ChannelListResponse = self
            .get_json(&url, &format!("channels(id={channel_id})"))
            .await?;

        if response.items.is_empty() {
            return Err(YoutubeError::ChannelNotFound);
        }
        Ok(response.items.swap_remove(0))
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, resource: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(resource)
            .expect("resource paths are valid URL segments");
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request through the retry policy, asserts a 2xx status,
    /// and parses the body into `T`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let body = self
            .retry
            .run(is_rate_limited, || async {
                let response = self.client.get(url.clone()).send().await?;
                let response = response.error_for_status()?;
                Ok::<String, YoutubeError>(response.text().await?)
            })
            .await?;

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

fn author_stats_of(channel: &ChannelResource) -> AuthorStats {
    let stats = channel.statistics.as_ref();
    AuthorStats {
        subscribers: stats
            .and_then(|s| s.subscriber_count.clone())
            .unwrap_or_else(|| "0".to_owned()),
        total_views: stats
            .and_then(|s| s.view_count.clone())
            .unwrap_or_else(|| "0".to_owned()),
    }
}

fn channel_profile(channel: &ChannelResource) -> ChannelProfile {
    let stats = channel.statistics.as_ref();
    ChannelProfile {
        id: channel.id.clone(),
        title: channel
            .snippet
            .as_ref()
            .map(|s| s.title.clone())
            .unwrap_or_default(),
        description: channel
            .snippet
            .as_ref()
            .map(|s| s.description.clone())
            .unwrap_or_default(),
        custom_url: channel.snippet.as_ref().and_then(|s| s.custom_url.clone()),
        statistics: ChannelStatistics {
            view_count: stats
                .and_then(|s| s.view_count.clone())
                .unwrap_or_else(|| "0".to_owned()),
            subscriber_count: stats
                .and_then(|s| s.subscriber_count.clone())
                .unwrap_or_else(|| "0".to_owned()),
            video_count: stats
                .and_then(|s| s.video_count.clone())
                .unwrap_or_else(|| "0".to_owned()),
        },
    }
}

fn build_trending(
    video: &VideoResource,
    author_stats: AuthorStats,
    now: chrono::DateTime<Utc>,
) -> TrendingVideo {
    let stats = video.statistics.as_ref();
    let views = stats
        .and_then(|s| s.view_count.clone())
        .unwrap_or_else(|| "0".to_owned());

    TrendingVideo {
        video_id: video.id.clone(),
        title: video.snippet.title.clone(),
        description: video.snippet.description.clone(),
        author: video.snippet.channel_title.clone(),
        author_stats,
        stats: VideoStats {
            views,
            likes: stats
                .and_then(|s| s.like_count.clone())
                .unwrap_or_else(|| "0".to_owned()),
            comments: stats
                .and_then(|s| s.comment_count.clone())
                .unwrap_or_else(|| "0".to_owned()),
        },
        tags: video.snippet.tags.clone(),
        category: video
            .snippet
            .category_id
            .clone()
            .unwrap_or_else(|| "N/A".to_owned()),
        published_text: published_label(video.snippet.published_at, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> YoutubeClient {
        YoutubeClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_resource_and_key() {
        let client = test_client("https://www.googleapis.com/youtube/v3");
        let url = client.build_url("videos", &[("chart", "mostPopular"), ("regionCode", "US")]);
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/youtube/v3/videos?chart=mostPopular&regionCode=US&key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://www.googleapis.com/youtube/v3/");
        let url = client.build_url("search", &[("q", "cooking & baking")]);
        assert!(
            url.as_str().contains("cooking+%26+baking")
                || url.as_str().contains("cooking%20%26%20baking"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn build_trending_defaults_missing_statistics() {
        let video: VideoResource = serde_json::from_value(serde_json::json!({
            "id": "vid1",
            "snippet": {
                "publishedAt": "2025-06-15T12:00:00Z",
                "channelId": "ch1",
                "title": "A video",
                "channelTitle": "A channel"
            }
        }))
        .expect("parse resource");

        let trending = build_trending(&video, AuthorStats::zeroed(), Utc::now());
        assert_eq!(trending.stats.views, "0");
        assert_eq!(trending.category, "N/A");
        assert!(trending.tags.is_empty());
    }
}
