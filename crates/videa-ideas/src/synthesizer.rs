//! The idea synthesizer.
//!
//! One synthesis call walks: trend aggregation → summarization → optional
//! per-channel enrichment → assistant-thread generation, with a stateless
//! completion as the fallback path and a fixed terminal error when both
//! fail.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use videa_core::{
    strip_code_fences, ChannelProfile, IdeaRequest, TrendAnalysis, TrendSummary, TrendingVideo,
    VideoFormat, VideoIdea,
};
use videa_openai::OpenAiClient;
use videa_trends::{aggregate_trending, summarize_trends, TrendCache};
use videa_youtube::YoutubeClient;

use crate::error::IdeaError;
use crate::prompt::build_idea_prompt;

/// The shape the generator is asked to emit. Every field is optional here;
/// absences are filled with documented defaults at construction. Fields the
/// model is not asked for (`id`, `createdAt`) are simply ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedIdea {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    concept: Option<String>,
    #[serde(default)]
    hashtags: Option<Vec<String>>,
    #[serde(default)]
    virality_score: Option<f64>,
    #[serde(default)]
    virality_justification: Option<String>,
    #[serde(default)]
    monetization_strategy: Option<String>,
    #[serde(default)]
    video_format: Option<VideoFormat>,
    #[serde(default)]
    trend_analysis: Option<TrendAnalysis>,
    #[serde(default)]
    channel_inspirations: Option<String>,
}

/// Generates video ideas from trend context and user preferences.
pub struct IdeaSynthesizer {
    youtube: Arc<YoutubeClient>,
    openai: Arc<OpenAiClient>,
    cache: Arc<TrendCache>,
    configured_assistant: Option<String>,
    /// Resolved assistant id, cached in-process after the first ensure.
    resolved_assistant: Mutex<Option<String>>,
}

impl IdeaSynthesizer {
    #[must_use]
    pub fn new(
        youtube: Arc<YoutubeClient>,
        openai: Arc<OpenAiClient>,
        cache: Arc<TrendCache>,
        configured_assistant: Option<String>,
    ) -> Self {
        Self {
            youtube,
            openai,
            cache,
            configured_assistant,
            resolved_assistant: Mutex::new(None),
        }
    }

    /// Runs one full synthesis: trends → summary → channel context →
    /// generate → typed [`VideoIdea`].
    ///
    /// # Errors
    ///
    /// - [`IdeaError::Trend`] if trending data for the region cannot be
    ///   resolved at all.
    /// - [`IdeaError::GenerationFailed`] once both generation paths are
    ///   exhausted.
    pub async fn generate(&self, request: &IdeaRequest) -> Result<VideoIdea, IdeaError> {
        tracing::info!(
            niche = %request.niche,
            platform = %request.platform,
            region = %request.region,
            virality_factor = request.virality_factor,
            improving = request.feedback.is_some(),
            "generating video idea"
        );

        let videos = aggregate_trending(&self.youtube, &self.cache, request.region).await?;
        let summary: TrendSummary =
            summarize_trends(&self.openai, &self.cache, request.region, &videos).await;

        let channels = self.collect_channel_context(request).await;
        let prompt = build_idea_prompt(request, &summary, &channels);

        let generated = match self.generate_via_assistant(&prompt).await {
            Ok(generated) => generated,
            Err(e) => {
                tracing::warn!(error = %e, "assistant path failed, falling back to completion");
                self.generate_via_completion(&prompt).await?
            }
        };

        Ok(build_video_idea(generated, request))
    }

    /// Fetches profile + top videos for each reference channel. A failed
    /// channel is omitted from context, never fatal to the request.
    async fn collect_channel_context(
        &self,
        request: &IdeaRequest,
    ) -> Vec<(ChannelProfile, Vec<TrendingVideo>)> {
        let mut channels = Vec::new();
        for channel_id in request.reference_channels.iter().flatten() {
            match self.youtube.fetch_channel_videos(channel_id).await {
                Ok((profile, videos)) => channels.push((profile, videos)),
                Err(e) => {
                    tracing::warn!(
                        channel_id = %channel_id,
                        error = %e,
                        "reference channel fetch failed, omitting it"
                    );
                }
            }
        }
        channels
    }

    /// Primary path: resolve the assistant once, run the prompt on a fresh
    /// thread, parse the reply. Any error here (transport, run failure,
    /// timeout, or contract violation) sends the caller to the fallback.
    async fn generate_via_assistant(&self, prompt: &str) -> Result<GeneratedIdea, IdeaError> {
        let assistant_id = {
            let mut resolved = self.resolved_assistant.lock().await;
            match resolved.as_ref() {
                Some(id) => id.clone(),
                None => {
                    let id = self
                        .openai
                        .ensure_assistant(self.configured_assistant.as_deref())
                        .await
                        .map_err(|e| {
                            tracing::warn!(error = %e, "assistant provisioning failed");
                            IdeaError::GenerationFailed
                        })?;
                    *resolved = Some(id.clone());
                    id
                }
            }
        };

        let reply = self
            .openai
            .run_assistant_with_prompt(&assistant_id, prompt)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "assistant run failed");
                IdeaError::GenerationFailed
            })?;

        parse_generated(&reply)
    }

    /// Fallback path: one stateless completion with the same prompt. A
    /// parse failure here is terminal.
    async fn generate_via_completion(&self, prompt: &str) -> Result<GeneratedIdea, IdeaError> {
        let reply = self.openai.chat_completion(prompt).await.map_err(|e| {
            tracing::error!(error = %e, "fallback completion failed");
            IdeaError::GenerationFailed
        })?;
        parse_generated(&reply)
    }
}

fn parse_generated(reply: &str) -> Result<GeneratedIdea, IdeaError> {
    let cleaned = strip_code_fences(reply);
    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::warn!(error = %e, "generated idea violated the JSON contract");
        IdeaError::GenerationFailed
    })
}

/// Builds the final [`VideoIdea`], filling every absent field with its
/// documented default. The id and creation timestamp are always freshly
/// assigned, regardless of anything in the model output.
fn build_video_idea(generated: GeneratedIdea, request: &IdeaRequest) -> VideoIdea {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let virality_score = generated
        .virality_score
        .map_or(0, |score| score.round().clamp(0.0, 100.0) as u8);

    VideoIdea {
        id: Uuid::new_v4(),
        title: generated
            .title
            .unwrap_or_else(|| "Untitled Video Idea".to_owned()),
        concept: generated
            .concept
            .unwrap_or_else(|| "No concept provided".to_owned()),
        hashtags: generated.hashtags.unwrap_or_default(),
        virality_score,
        virality_justification: generated.virality_justification.unwrap_or_default(),
        monetization_strategy: generated.monetization_strategy.unwrap_or_default(),
        video_format: generated
            .video_format
            .unwrap_or_else(VideoFormat::default_short_form),
        platform: request.platform,
        content_type: request.content_type,
        created_at: Utc::now(),
        trend_analysis: generated.trend_analysis.unwrap_or_default(),
        region: request.region,
        channel_inspirations: generated.channel_inspirations,
        user_id: None,
        is_saved: None,
    }
}
