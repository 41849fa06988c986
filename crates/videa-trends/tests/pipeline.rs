//! Integration tests for aggregation and summarization against wiremock
//! upstreams.

use std::time::Duration;

use videa_core::{Region, RetryPolicy, TrendSummary};
use videa_openai::OpenAiClient;
use videa_trends::{aggregate_trending, summarize_trends, TrendCache, TrendError};
use videa_youtube::YoutubeClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn youtube_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy {
            max_retries: 0,
            base_delay_ms: 0,
        })
}

fn openai_client(base_url: &str) -> OpenAiClient {
    OpenAiClient::with_base_url("sk-test", "gpt-4o-mini", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy {
            max_retries: 0,
            base_delay_ms: 0,
        })
}

fn region_body(region: &str, views: u64) -> serde_json::Value {
    serde_json::json!({
        "items": [
            {
                "id": format!("vid-{region}"),
                "snippet": {
                    "publishedAt": "2025-06-01T00:00:00Z",
                    "channelId": format!("ch-{region}"),
                    "title": format!("Headline{views} feature{views} {region}"),
                    "channelTitle": format!("Creator {region}"),
                    "categoryId": "24"
                },
                "statistics": { "viewCount": views.to_string() }
            }
        ]
    })
}

async fn mount_channel_stats(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                { "id": "any", "statistics": { "subscriberCount": "10", "viewCount": "20" } }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn global_aggregation_tolerates_failed_regions() {
    let server = MockServer::start().await;
    mount_channel_stats(&server).await;

    // Two regions fail hard; the rest return one distinct video each.
    for (index, region) in ["US", "GB", "IN", "JP", "BR", "CA", "DE", "FR"]
        .iter()
        .enumerate()
    {
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("regionCode", *region))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(region_body(region, 10_000 - index as u64)),
            )
            .mount(&server)
            .await;
    }
    for region in ["AU", "KR"] {
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("regionCode", region))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
    }

    let youtube = youtube_client(&server.uri());
    let cache = TrendCache::default();
    let videos = aggregate_trending(&youtube, &cache, Region::Global)
        .await
        .expect("partial failure must not fail the aggregate");

    assert_eq!(videos.len(), 8, "eight successful regions, one video each");
    assert_eq!(videos[0].video_id, "vid-US", "sorted by views desc");
    assert!(videos.iter().all(|v| v.author_stats.subscribers == "10"));
}

#[tokio::test]
async fn global_aggregation_fails_only_when_every_region_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let youtube = youtube_client(&server.uri());
    let cache = TrendCache::default();
    let result = aggregate_trending(&youtube, &cache, Region::Global).await;
    assert!(matches!(result, Err(TrendError::NoTrendingData)));
}

#[tokio::test]
async fn aggregation_reuses_the_cache_within_the_ttl() {
    let server = MockServer::start().await;
    mount_channel_stats(&server).await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("regionCode", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(region_body("US", 500)))
        .expect(1)
        .mount(&server)
        .await;

    let youtube = youtube_client(&server.uri());
    let cache = TrendCache::default();

    let first = aggregate_trending(&youtube, &cache, Region::Us)
        .await
        .expect("first fetch succeeds");
    let second = aggregate_trending(&youtube, &cache, Region::Us)
        .await
        .expect("second fetch is served from cache");
    assert_eq!(first, second);
}

#[tokio::test]
async fn expired_cache_triggers_a_refetch() {
    let server = MockServer::start().await;
    mount_channel_stats(&server).await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("regionCode", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(region_body("US", 500)))
        .expect(2)
        .mount(&server)
        .await;

    let youtube = youtube_client(&server.uri());
    let cache = TrendCache::new(Duration::ZERO);

    aggregate_trending(&youtube, &cache, Region::Us)
        .await
        .expect("first fetch");
    aggregate_trending(&youtube, &cache, Region::Us)
        .await
        .expect("second fetch refetches");
}

fn full_summary_body() -> &'static str {
    r#"```json
{
  "themes": ["nostalgia"],
  "contentTypes": ["shorts"],
  "videoFormats": ["vertical"],
  "trendingTopics": ["retro gaming"],
  "engagementInsights": ["comments spike on day one"],
  "topCategories": ["Gaming"],
  "titlePatterns": ["I tried X for 30 days"],
  "popularTags": ["gaming"]
}
```"#
}

fn sample_videos() -> Vec<videa_core::TrendingVideo> {
    vec![videa_core::TrendingVideo {
        video_id: "v1".to_owned(),
        title: "A video".to_owned(),
        description: String::new(),
        author: "Author".to_owned(),
        author_stats: videa_core::AuthorStats::zeroed(),
        stats: videa_core::VideoStats {
            views: "100".to_owned(),
            likes: "5".to_owned(),
            comments: "1".to_owned(),
        },
        tags: vec!["gaming".to_owned()],
        category: "20".to_owned(),
        published_text: "Today".to_owned(),
    }]
}

#[tokio::test]
async fn summarizer_parses_fenced_json_and_caches_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "message": { "content": full_summary_body() } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let openai = openai_client(&server.uri());
    let cache = TrendCache::default();
    let videos = sample_videos();

    let summary = summarize_trends(&openai, &cache, Region::Us, &videos).await;
    assert_eq!(summary.themes, vec!["nostalgia".to_owned()]);
    assert_eq!(summary.popular_tags, vec!["gaming".to_owned()]);

    // Second call within the TTL must not hit the model again (expect(1)).
    let again = summarize_trends(&openai, &cache, Region::Us, &videos).await;
    assert_eq!(summary, again);
}

#[tokio::test]
async fn summarizer_degrades_to_placeholder_on_missing_fields() {
    let server = MockServer::start().await;

    // Seven of eight fields: must be rejected wholesale.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "message": { "content": r#"{
                "themes": ["a"], "contentTypes": ["b"], "videoFormats": ["c"],
                "trendingTopics": ["d"], "engagementInsights": ["e"],
                "topCategories": ["f"], "titlePatterns": ["g"]
            }"# } } ]
        })))
        .mount(&server)
        .await;

    let openai = openai_client(&server.uri());
    let cache = TrendCache::default();
    let summary = summarize_trends(&openai, &cache, Region::Us, &sample_videos()).await;
    assert_eq!(summary, TrendSummary::placeholder());

    // Failures are not cached.
    assert!(cache.fresh_summary(Region::Us).await.is_none());
}

#[tokio::test]
async fn summarizer_degrades_to_placeholder_on_llm_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let openai = openai_client(&server.uri());
    let cache = TrendCache::default();
    let summary = summarize_trends(&openai, &cache, Region::Us, &sample_videos()).await;
    assert_eq!(summary, TrendSummary::placeholder());
}
