//! Generation-prompt composition.
//!
//! One prompt carries the request parameters, the trend summary, optional
//! reference-channel highlights, and, when the user is iterating on a
//! prior idea, the previous idea plus their feedback, switching the
//! framing from "create an original" to "improve an existing".

use std::fmt::Write as _;

use serde::Deserialize;

use videa_core::{ChannelProfile, IdeaRequest, TrendSummary, TrendingVideo};

/// Reference-channel context is limited to each channel's top videos.
const TOP_VIDEOS_PER_CHANNEL: usize = 5;

/// The fields of a previous idea worth echoing back for improvement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviousIdea {
    title: String,
    concept: String,
    #[serde(default)]
    hashtags: Vec<String>,
    #[serde(default)]
    virality_score: u8,
    #[serde(default)]
    monetization_strategy: String,
}

/// Builds the single generation prompt for `request`.
pub(crate) fn build_idea_prompt(
    request: &IdeaRequest,
    summary: &TrendSummary,
    channels: &[(ChannelProfile, Vec<TrendingVideo>)],
) -> String {
    let improving = request.feedback.is_some();
    let framing = if improving {
        "IMPROVE AN EXISTING"
    } else {
        "CREATE AN ORIGINAL"
    };

    let mut prompt = format!(
        "{framing} viral video idea for {} focusing on the {} niche.\n\nDetails:\n- Content type: {}\n- Region: {}\n- Virality factor: {}% (higher means more experimental)\n",
        request.platform, request.niche, request.content_type, request.region, request.virality_factor,
    );
    if let Some(keywords) = &request.keywords {
        let _ = writeln!(prompt, "- Keywords to incorporate: {keywords}");
    }

    let _ = write!(
        prompt,
        "\nBased on current YouTube trending data:\n\
         - Common themes: {}\n\
         - Popular content types: {}\n\
         - Trending topics: {}\n\
         - Engagement insights: {}\n\
         - Top categories: {}\n\
         - Title patterns: {}\n\
         - Popular tags: {}\n",
        summary.themes.join(", "),
        summary.content_types.join(", "),
        summary.trending_topics.join(", "),
        summary.engagement_insights.join(", "),
        summary.top_categories.join(", "),
        summary.title_patterns.join(", "),
        summary.popular_tags.join(", "),
    );

    if !channels.is_empty() {
        prompt.push_str("\nReference Channels Analysis:\n");
        for (index, (profile, videos)) in channels.iter().enumerate() {
            let _ = write!(
                prompt,
                "\nChannel {}: {}\nSubscribers: {}\nTop Performing Videos:\n",
                index + 1,
                profile.title,
                profile.statistics.subscriber_count,
            );
            for (video_index, video) in videos.iter().take(TOP_VIDEOS_PER_CHANNEL).enumerate() {
                let _ = writeln!(
                    prompt,
                    "{}. \"{}\"\nStats: {} views, {} likes, {} comments\nTags: {}",
                    video_index + 1,
                    video.title,
                    video.stats.views,
                    video.stats.likes,
                    video.stats.comments,
                    video.tags.join(", "),
                );
            }
        }
    }

    if improving {
        if let Some(previous) = request
            .previous_idea
            .as_deref()
            .and_then(parse_previous_idea)
        {
            let _ = write!(
                prompt,
                "\nPREVIOUS IDEA TO IMPROVE:\n\
                 Title: \"{}\"\n\
                 Concept: \"{}\"\n\
                 Hashtags: {}\n\
                 Virality Score: {}%\n\
                 Monetization Strategy: \"{}\"\n\
                 \n\
                 Using the user's feedback, create an IMPROVED version of this idea. Maintain the strengths but address the feedback directly.\n",
                previous.title,
                previous.concept,
                previous.hashtags.join(", "),
                previous.virality_score,
                previous.monetization_strategy,
            );
        }
        if let Some(feedback) = &request.feedback {
            let _ = write!(
                prompt,
                "\nUSER FEEDBACK TO INCORPORATE:\n\"{feedback}\"\n\nPlease carefully consider this feedback and make specific improvements to the previous idea based on it.\n",
            );
        }
    }

    if improving {
        prompt.push_str(
            "\nCreate an improved version of the video idea by incorporating the user's feedback while maintaining viral potential.\n",
        );
    } else {
        prompt.push_str("\nCreate a completely original video idea that:\n");
    }
    let _ = write!(
        prompt,
        "1. Leverages current trends\n\
         2. Has viral potential\n\
         3. Is authentic to the {} niche\n\
         4. Works well on {}\n\
         5. Incorporates insights from the reference channels (if provided)\n",
        request.niche, request.platform,
    );
    if improving {
        prompt.push_str("6. Directly addresses the user's feedback for improvements\n");
    }

    prompt.push_str(
        "\nProvide a JSON response in this exact format (no markdown, no code blocks):\n\
         {\n\
           \"title\": \"Catchy video title\",\n\
           \"concept\": \"Detailed description of the video concept, structure, and execution\",\n\
           \"hashtags\": [\"tag1\", \"tag2\", \"tag3\"],\n\
           \"viralityScore\": 85,\n\
           \"viralityJustification\": \"Explanation of why this idea has viral potential\",\n\
           \"monetizationStrategy\": \"How to monetize this content\",\n\
           \"videoFormat\": {\n\
             \"type\": \"The type of video format that works best\",\n\
             \"length\": \"Optimal video length\",\n\
             \"hooks\": [\"Key moment 1 to hook viewers\", \"Key moment 2\", \"Key moment 3\"]\n\
           },\n\
           \"trendAnalysis\": {\n\
             \"relevantThemes\": [\"theme1\", \"theme2\"],\n\
             \"relatedContent\": [\"related1\", \"related2\"],\n\
             \"suggestedTags\": [\"tag1\", \"tag2\", \"tag3\"]\n\
           },\n\
           \"channelInspirations\": \"How the reference channels influenced this idea (only if reference channels were provided)\"\n\
         }\n",
    );

    prompt
}

fn parse_previous_idea(raw: &str) -> Option<PreviousIdea> {
    match serde_json::from_str(raw) {
        Ok(previous) => Some(previous),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse previous idea, omitting it from the prompt");
            None
        }
    }
}
