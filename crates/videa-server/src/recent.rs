//! Rolling buffer of recently generated ideas.
//!
//! Serves the public recent-ideas endpoint when the store is unreachable
//! and holds unsaved ideas for unauthenticated sessions. Process-local and
//! best-effort by design.

use std::collections::VecDeque;

use tokio::sync::Mutex;

use videa_core::VideoIdea;

const DEFAULT_CAPACITY: usize = 10;

/// Bounded newest-first buffer of generated ideas.
pub struct RecentIdeas {
    capacity: usize,
    buffer: Mutex<VecDeque<VideoIdea>>,
}

impl Default for RecentIdeas {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentIdeas {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Pushes a freshly generated idea, evicting the oldest past capacity.
    pub async fn push(&self, idea: VideoIdea) {
        let mut buffer = self.buffer.lock().await;
        buffer.push_front(idea);
        buffer.truncate(self.capacity);
    }

    /// Snapshot of the buffer, newest first.
    pub async fn snapshot(&self) -> Vec<VideoIdea> {
        self.buffer.lock().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use videa_core::{ContentType, Platform, Region, TrendAnalysis, VideoFormat};

    use super::*;

    fn idea(title: &str) -> VideoIdea {
        VideoIdea {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            concept: String::new(),
            hashtags: vec![],
            virality_score: 0,
            virality_justification: String::new(),
            monetization_strategy: String::new(),
            video_format: VideoFormat::default_short_form(),
            platform: Platform::Tiktok,
            content_type: ContentType::Entertainment,
            created_at: Utc::now(),
            trend_analysis: TrendAnalysis::default(),
            region: Region::Us,
            channel_inspirations: None,
            user_id: None,
            is_saved: None,
        }
    }

    #[tokio::test]
    async fn newest_ideas_come_first() {
        let recent = RecentIdeas::default();
        recent.push(idea("first")).await;
        recent.push(idea("second")).await;

        let snapshot = recent.snapshot().await;
        assert_eq!(snapshot[0].title, "second");
        assert_eq!(snapshot[1].title, "first");
    }

    #[tokio::test]
    async fn capacity_evicts_the_oldest() {
        let recent = RecentIdeas::new(3);
        for index in 0..5 {
            recent.push(idea(&format!("idea {index}"))).await;
        }

        let snapshot = recent.snapshot().await;
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].title, "idea 4");
        assert_eq!(snapshot[2].title, "idea 2");
    }
}
