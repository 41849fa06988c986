//! Trend summarization via one LLM call with a strict JSON contract.

use std::collections::HashMap;
use std::fmt::Write as _;

use videa_core::{strip_code_fences, Region, TrendSummary, TrendingVideo};
use videa_openai::OpenAiClient;

use crate::cache::TrendCache;

/// Detailed per-video context is limited to the most engaging entries.
const TOP_VIDEOS_FOR_ANALYSIS: usize = 20;
const TOP_CATEGORIES: usize = 5;
const TOP_TAGS: usize = 10;

/// Reduces `videos` into a [`TrendSummary`], consulting and populating the
/// per-region summary slot in `cache` (1-hour TTL).
///
/// Never fails: an LLM error or a contract-violating response degrades to
/// [`TrendSummary::placeholder`] so synthesis always has a summary to work
/// from. Only successful summaries are cached.
pub async fn summarize_trends(
    openai: &OpenAiClient,
    cache: &TrendCache,
    region: Region,
    videos: &[TrendingVideo],
) -> TrendSummary {
    if let Some(summary) = cache.fresh_summary(region).await {
        tracing::debug!(region = %region, "serving trend summary from cache");
        return summary;
    }

    let prompt = build_analysis_prompt(videos);
    let response = match openai.chat_completion(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(region = %region, error = %e, "trend analysis call failed");
            return TrendSummary::placeholder();
        }
    };

    let cleaned = strip_code_fences(&response);
    match serde_json::from_str::<TrendSummary>(&cleaned) {
        Ok(summary) => {
            cache.store_summary(region, summary.clone()).await;
            summary
        }
        Err(e) => {
            tracing::warn!(
                region = %region,
                error = %e,
                "trend analysis response violated the JSON contract"
            );
            TrendSummary::placeholder()
        }
    }
}

/// Builds the analysis prompt: the top videos by engagement in detail, plus
/// frequency-ranked categories and tags across the whole set.
fn build_analysis_prompt(videos: &[TrendingVideo]) -> String {
    let mut ranked: Vec<&TrendingVideo> = videos.iter().collect();
    ranked.sort_by(|a, b| b.stats.engagement().cmp(&a.stats.engagement()));
    ranked.truncate(TOP_VIDEOS_FOR_ANALYSIS);

    let mut prompt = format!(
        "Analyze these {} trending YouTube videos. I'm providing detailed data for the {} most engaging videos:\n\nTop Performing Videos:\n",
        videos.len(),
        ranked.len()
    );

    for (index, video) in ranked.iter().enumerate() {
        let _ = write!(
            prompt,
            "\n{}. \"{}\"\nAuthor: {} ({} subscribers)\nStats: {} views, {} likes, {} comments\nCategory: {}\nTags: {}\nPublished: {}\n",
            index + 1,
            video.title,
            video.author,
            video.author_stats.subscribers,
            video.stats.views,
            video.stats.likes,
            video.stats.comments,
            video.category,
            video.tags.join(", "),
            video.published_text,
        );
    }

    let _ = write!(
        prompt,
        "\nAdditional Context:\n- Total videos analyzed: {}\n- Most common categories: {}\n- Most used tags: {}\n",
        videos.len(),
        top_categories(videos, TOP_CATEGORIES).join(", "),
        top_tags(videos, TOP_TAGS).join(", "),
    );

    prompt.push_str(
        "\nPlease provide a comprehensive analysis including:\n\
         1. Common themes and patterns\n\
         2. Popular content types\n\
         3. Successful video formats\n\
         4. Trending topics\n\
         5. Engagement patterns\n\
         6. Top performing categories\n\
         7. Most effective video titles\n\
         8. Popular hashtags/tags\n\
         \n\
         Respond with ONLY a JSON object in this exact format (no markdown, no code blocks):\n\
         {\n\
           \"themes\": [\"theme1\", \"theme2\"],\n\
           \"contentTypes\": [\"type1\", \"type2\"],\n\
           \"videoFormats\": [\"format1\", \"format2\"],\n\
           \"trendingTopics\": [\"topic1\", \"topic2\"],\n\
           \"engagementInsights\": [\"insight1\", \"insight2\"],\n\
           \"topCategories\": [\"category1\", \"category2\"],\n\
           \"titlePatterns\": [\"pattern1\", \"pattern2\"],\n\
           \"popularTags\": [\"tag1\", \"tag2\"]\n\
         }\n",
    );

    prompt
}

/// The `limit` most frequent categories across the set.
fn top_categories(videos: &[TrendingVideo], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for video in videos {
        *counts.entry(video.category.as_str()).or_insert(0) += 1;
    }
    rank_by_count(counts, limit)
}

/// The `limit` most frequent tags across the set.
fn top_tags(videos: &[TrendingVideo], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for video in videos {
        for tag in &video.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    rank_by_count(counts, limit)
}

fn rank_by_count(counts: HashMap<&str, usize>, limit: usize) -> Vec<String> {
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(value, _)| value.to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use videa_core::{AuthorStats, VideoStats};

    use super::*;

    fn video(id: &str, category: &str, tags: &[&str], views: u64) -> TrendingVideo {
        TrendingVideo {
            video_id: id.to_owned(),
            title: format!("Video {id}"),
            description: String::new(),
            author: "Author".to_owned(),
            author_stats: AuthorStats::zeroed(),
            stats: VideoStats {
                views: views.to_string(),
                likes: "0".to_owned(),
                comments: "0".to_owned(),
            },
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            category: category.to_owned(),
            published_text: "Today".to_owned(),
        }
    }

    #[test]
    fn top_categories_ranks_by_frequency() {
        let videos = vec![
            video("a", "Gaming", &[], 1),
            video("b", "Gaming", &[], 1),
            video("c", "Music", &[], 1),
        ];
        assert_eq!(top_categories(&videos, 5), vec!["Gaming", "Music"]);
    }

    #[test]
    fn top_tags_respects_the_limit() {
        let videos = vec![
            video("a", "1", &["x", "y", "x"], 1),
            video("b", "1", &["x", "z"], 1),
        ];
        let tags = top_tags(&videos, 2);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], "x");
    }

    #[test]
    fn prompt_embeds_only_the_most_engaging_videos() {
        let videos: Vec<TrendingVideo> = (0..30)
            .map(|i| video(&format!("v{i}"), "1", &[], 1000 - i))
            .collect();
        let prompt = build_analysis_prompt(&videos);
        assert!(prompt.contains("detailed data for the 20 most engaging"));
        assert!(prompt.contains("\"Video v0\""));
        assert!(prompt.contains("\"Video v19\""));
        assert!(!prompt.contains("\"Video v20\""));
        assert!(prompt.contains("Total videos analyzed: 30"));
    }

    #[test]
    fn prompt_demands_the_eight_field_contract() {
        let prompt = build_analysis_prompt(&[video("a", "1", &[], 1)]);
        for field in [
            "\"themes\"",
            "\"contentTypes\"",
            "\"videoFormats\"",
            "\"trendingTopics\"",
            "\"engagementInsights\"",
            "\"topCategories\"",
            "\"titlePatterns\"",
            "\"popularTags\"",
        ] {
            assert!(prompt.contains(field), "prompt missing {field}");
        }
        assert!(prompt.contains("ONLY a JSON object"));
    }
}
