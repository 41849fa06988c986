//! Integration tests for `YoutubeClient` using wiremock HTTP mocks.

use videa_core::{Region, RetryPolicy};
use videa_youtube::{YoutubeClient, YoutubeError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy {
            max_retries: 3,
            base_delay_ms: 0,
        })
}

fn trending_body() -> serde_json::Value {
    serde_json::json!({
        "items": [
            {
                "id": "vid-low",
                "snippet": {
                    "publishedAt": "2025-06-01T00:00:00Z",
                    "channelId": "ch-1",
                    "title": "Smaller video",
                    "description": "d1",
                    "channelTitle": "Creator One",
                    "tags": ["one"],
                    "categoryId": "22"
                },
                "statistics": { "viewCount": "100", "likeCount": "10", "commentCount": "1" }
            },
            {
                "id": "vid-high",
                "snippet": {
                    "publishedAt": "2025-06-02T00:00:00Z",
                    "channelId": "ch-2",
                    "title": "Bigger video",
                    "description": "d2",
                    "channelTitle": "Creator Two",
                    "tags": ["two"],
                    "categoryId": "10"
                },
                "statistics": { "viewCount": "5000", "likeCount": "400", "commentCount": "20" }
            }
        ]
    })
}

fn channel_stats_body(id: &str, subscribers: &str, views: &str) -> serde_json::Value {
    serde_json::json!({
        "items": [
            { "id": id, "statistics": { "subscriberCount": subscribers, "viewCount": views } }
        ]
    })
}

#[tokio::test]
async fn fetch_trending_enriches_and_sorts_by_views() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("chart", "mostPopular"))
        .and(query_param("regionCode", "US"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trending_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "ch-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(channel_stats_body("ch-1", "1000", "99999")),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "ch-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(channel_stats_body("ch-2", "2000", "88888")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .fetch_trending(Region::Us)
        .await
        .expect("trending fetch should succeed");

    assert_eq!(videos.len(), 2);
    // Highest views first, regardless of response order.
    assert_eq!(videos[0].video_id, "vid-high");
    assert_eq!(videos[0].author_stats.subscribers, "2000");
    assert_eq!(videos[1].video_id, "vid-low");
    assert_eq!(videos[1].author_stats.total_views, "99999");
    assert_eq!(videos[1].tags, vec!["one".to_owned()]);
}

#[tokio::test]
async fn fetch_trending_degrades_items_whose_enrichment_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(trending_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "ch-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(channel_stats_body("ch-2", "2000", "88888")),
        )
        .mount(&server)
        .await;

    // ch-1 lookups fail hard; the item must survive with zeroed stats.
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "ch-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .fetch_trending(Region::Us)
        .await
        .expect("per-item failure must not fail the fetch");

    assert_eq!(videos.len(), 2);
    let degraded = videos
        .iter()
        .find(|v| v.video_id == "vid-low")
        .expect("degraded item present");
    assert_eq!(degraded.author_stats.subscribers, "0");
    assert_eq!(degraded.author_stats.total_views, "0");
}

#[tokio::test]
async fn rate_limited_requests_are_retried() {
    let server = MockServer::start().await;

    // First hit is rate-limited, the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .fetch_trending(Region::Gb)
        .await
        .expect("429 should be retried");
    assert!(videos.is_empty());
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_trending(Region::Us).await;
    assert!(matches!(result, Err(YoutubeError::Http(_))));
}

#[tokio::test]
async fn get_channel_maps_empty_result_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.get_channel("missing-channel").await;
    assert!(matches!(result, Err(YoutubeError::ChannelNotFound)));
}

#[tokio::test]
async fn search_channels_maps_empty_result_to_domain_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search_channels("nobody", 5).await;
    assert!(matches!(result, Err(YoutubeError::NoChannelsFound)));
}

#[tokio::test]
async fn search_channels_returns_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "cooking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": { "channelId": "ch-cook" },
                    "snippet": { "title": "Cooking Channel", "description": "Recipes" }
                },
                {
                    "id": {},
                    "snippet": { "title": "Not a channel", "description": "" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let channels = client
        .search_channels("cooking", 5)
        .await
        .expect("search should succeed");

    // Hits without a channel id are dropped.
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].channel_id, "ch-cook");
    assert_eq!(channels[0].title, "Cooking Channel");
}

#[tokio::test]
async fn fetch_channel_videos_returns_profile_and_top_videos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "ch-main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": "ch-main",
                    "snippet": {
                        "title": "Main Channel",
                        "description": "About",
                        "customUrl": "@main"
                    },
                    "statistics": {
                        "viewCount": "100000",
                        "subscriberCount": "5000",
                        "videoCount": "42"
                    },
                    "contentDetails": { "relatedPlaylists": { "uploads": "UU-main" } }
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU-main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                { "contentDetails": { "videoId": "v1" } },
                { "contentDetails": { "videoId": "v2" } }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "v1,v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": "v1",
                    "snippet": {
                        "publishedAt": "2025-05-01T00:00:00Z",
                        "channelId": "ch-main",
                        "title": "Old but small",
                        "channelTitle": "Main Channel"
                    },
                    "statistics": { "viewCount": "10" }
                },
                {
                    "id": "v2",
                    "snippet": {
                        "publishedAt": "2025-06-01T00:00:00Z",
                        "channelId": "ch-main",
                        "title": "The hit",
                        "channelTitle": "Main Channel"
                    },
                    "statistics": { "viewCount": "9000" }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let (profile, videos) = client
        .fetch_channel_videos("ch-main")
        .await
        .expect("channel fetch should succeed");

    assert_eq!(profile.id, "ch-main");
    assert_eq!(profile.title, "Main Channel");
    assert_eq!(profile.custom_url.as_deref(), Some("@main"));
    assert_eq!(profile.statistics.subscriber_count, "5000");

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].video_id, "v2", "sorted by views desc");
    assert_eq!(videos[0].author_stats.subscribers, "5000");
}
