//! Multi-region trending aggregation.
//!
//! The global view fans the region fetcher out over [`GLOBAL_REGIONS`],
//! merges, de-duplicates by video id (keeping the higher-view instance),
//! and applies a diversity pass before trimming to the top list. A single
//! region skips the title-similarity filter and only caps per-author
//! appearances.

use std::collections::{HashMap, HashSet};

use videa_core::{Region, TrendingVideo, GLOBAL_REGIONS};
use videa_youtube::YoutubeClient;

use crate::cache::TrendCache;
use crate::error::TrendError;

/// Final list size.
const TOP_LIMIT: usize = 10;

/// Maximum admitted videos per author.
const AUTHOR_CAP: usize = 2;

/// Words shorter than this do not count toward title similarity.
const SIGNIFICANT_WORD_LEN: usize = 3;

/// Returns the bounded, diversified trending list for `region`, consulting
/// and populating `cache` (1-hour TTL by default).
///
/// For [`Region::Global`] the fixed region set is fetched concurrently and
/// failed regions contribute zero items; the call only fails when every
/// region fails.
///
/// # Errors
///
/// - [`TrendError::Youtube`] when a single-region fetch fails.
/// - [`TrendError::NoTrendingData`] when the global fan-out yields nothing.
pub async fn aggregate_trending(
    youtube: &YoutubeClient,
    cache: &TrendCache,
    region: Region,
) -> Result<Vec<TrendingVideo>, TrendError> {
    if let Some(videos) = cache.fresh_videos(region).await {
        tracing::debug!(region = %region, "serving trending videos from cache");
        return Ok(videos);
    }

    let videos = match region {
        Region::Global => aggregate_global(youtube).await?,
        single => aggregate_single(youtube, single).await?,
    };

    cache.store_videos(region, videos.clone()).await;
    Ok(videos)
}

async fn aggregate_global(youtube: &YoutubeClient) -> Result<Vec<TrendingVideo>, TrendError> {
    let results =
        futures::future::join_all(GLOBAL_REGIONS.iter().map(|r| youtube.fetch_trending(*r)))
            .await;

    let mut merged = Vec::new();
    for (region, result) in GLOBAL_REGIONS.iter().zip(results) {
        match result {
            Ok(videos) => merged.extend(videos),
            Err(e) => {
                tracing::warn!(
                    region = %region,
                    error = %e,
                    "region fetch failed, continuing without it"
                );
            }
        }
    }

    if merged.is_empty() {
        return Err(TrendError::NoTrendingData);
    }

    let mut deduped = dedupe_keep_higher_views(merged);
    sort_by_views_desc(&mut deduped);
    Ok(diversify(&deduped, true))
}

async fn aggregate_single(
    youtube: &YoutubeClient,
    region: Region,
) -> Result<Vec<TrendingVideo>, TrendError> {
    let mut videos = youtube.fetch_trending(region).await?;
    sort_by_views_desc(&mut videos);
    Ok(diversify(&videos, false))
}

/// Collapses duplicate video ids, keeping the instance with more views.
///
/// Idempotent: applying it to an already-deduplicated list is a no-op.
fn dedupe_keep_higher_views(videos: Vec<TrendingVideo>) -> Vec<TrendingVideo> {
    let mut unique: HashMap<String, TrendingVideo> = HashMap::new();
    for video in videos {
        match unique.get(&video.video_id) {
            Some(existing) if existing.stats.view_count() >= video.stats.view_count() => {}
            _ => {
                unique.insert(video.video_id.clone(), video);
            }
        }
    }
    unique.into_values().collect()
}

fn sort_by_views_desc(videos: &mut [TrendingVideo]) {
    videos.sort_by(|a, b| b.stats.view_count().cmp(&a.stats.view_count()));
}

/// Admits videos in rank order, skipping any whose author already has
/// [`AUTHOR_CAP`] entries or (when `check_titles` is set) whose title is
/// too close to an admitted one, then backfills from the ranked list until
/// [`TOP_LIMIT`] or exhaustion.
fn diversify(ranked: &[TrendingVideo], check_titles: bool) -> Vec<TrendingVideo> {
    let mut admitted: Vec<TrendingVideo> = Vec::with_capacity(TOP_LIMIT);
    let mut author_counts: HashMap<&str, usize> = HashMap::new();
    let mut seen_titles: Vec<String> = Vec::new();

    for video in ranked {
        if admitted.len() >= TOP_LIMIT {
            break;
        }
        if author_counts.get(video.author.as_str()).copied().unwrap_or(0) >= AUTHOR_CAP {
            continue;
        }
        let normalized = normalize_title(&video.title);
        if check_titles && is_title_similar(&normalized, &seen_titles) {
            continue;
        }

        *author_counts.entry(video.author.as_str()).or_insert(0) += 1;
        seen_titles.push(normalized);
        admitted.push(video.clone());
    }

    // Backfill: diversity never shrinks the list below what's available.
    if admitted.len() < TOP_LIMIT {
        let included: HashSet<String> =
            admitted.iter().map(|v| v.video_id.clone()).collect();
        for video in ranked {
            if admitted.len() >= TOP_LIMIT {
                break;
            }
            if !included.contains(&video.video_id) {
                admitted.push(video.clone());
            }
        }
    }

    admitted
}

/// Lowercases and strips punctuation, keeping word characters and spaces.
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}

/// A title is similar when its significant words (longer than
/// [`SIGNIFICANT_WORD_LEN`]) overlap an already-admitted title by 40% or
/// more, capped at three matching words.
fn is_title_similar(normalized: &str, seen: &[String]) -> bool {
    let significant: Vec<&str> = normalized
        .split_whitespace()
        .filter(|w| w.len() > SIGNIFICANT_WORD_LEN)
        .collect();
    if significant.is_empty() {
        return false;
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let threshold = ((significant.len() as f64 * 0.4).floor() as usize).clamp(1, 3);

    for existing in seen {
        let existing_words: HashSet<&str> = existing.split_whitespace().collect();
        let matches = significant
            .iter()
            .filter(|w| existing_words.contains(**w))
            .count();
        if matches >= threshold {
            return true;
        }
    }
    false
}
