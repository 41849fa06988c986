//! Database operations for the `video_ideas` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use videa_core::{ContentType, Platform, Region, TrendAnalysis, VideoFormat, VideoIdea};

use crate::{map_sqlx_error, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `video_ideas` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdeaRow {
    pub id: Uuid,
    pub title: String,
    pub concept: String,
    pub platform: String,
    pub content_type: String,
    pub virality_score: i16,
    pub virality_justification: String,
    pub monetization_strategy: String,
    pub video_format: serde_json::Value,
    pub hashtags: Vec<String>,
    pub trend_analysis: serde_json::Value,
    pub region: String,
    pub channel_inspirations: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl IdeaRow {
    /// Converts a stored row back into the domain shape, marking it saved.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] if an enum column holds a value outside
    /// the catalog.
    pub fn into_idea(self) -> Result<VideoIdea, DbError> {
        let platform: Platform = decode_enum(&self.platform, "platform")?;
        let content_type: ContentType = decode_enum(&self.content_type, "content_type")?;

        let video_format: VideoFormat = serde_json::from_value(self.video_format)
            .unwrap_or_else(|_| VideoFormat::default_short_form());
        let trend_analysis: TrendAnalysis =
            serde_json::from_value(self.trend_analysis).unwrap_or_default();

        #[allow(clippy::cast_sign_loss)]
        let virality_score = self.virality_score.clamp(0, 100) as u8;

        Ok(VideoIdea {
            id: self.id,
            title: self.title,
            concept: self.concept,
            hashtags: self.hashtags,
            virality_score,
            virality_justification: self.virality_justification,
            monetization_strategy: self.monetization_strategy,
            video_format,
            platform,
            content_type,
            created_at: self.created_at,
            trend_analysis,
            region: Region::parse(&self.region),
            channel_inspirations: self.channel_inspirations,
            user_id: Some(self.user_id),
            is_saved: Some(true),
        })
    }
}

fn decode_enum<T: serde::de::DeserializeOwned>(raw: &str, column: &str) -> Result<T, DbError> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned())).map_err(|_| {
        DbError::Decode {
            context: format!("{column} holds unknown value '{raw}'"),
        }
    })
}

fn enum_to_wire<T: serde::Serialize>(value: &T) -> String {
    // Enum wire names are plain strings by construction.
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(ToOwned::to_owned))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const IDEA_COLUMNS: &str = "id, title, concept, platform, content_type, virality_score, \
     virality_justification, monetization_strategy, video_format, hashtags, \
     trend_analysis, region, channel_inspirations, user_id, created_at";

/// Inserts an idea for `user_id` and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Unprovisioned`] when the table is missing, or
/// [`DbError::Sqlx`] on any other query failure.
pub async fn insert_idea(
    pool: &PgPool,
    idea: &VideoIdea,
    user_id: Uuid,
) -> Result<IdeaRow, DbError> {
    let query = format!(
        "INSERT INTO video_ideas \
         (id, title, concept, platform, content_type, virality_score, \
          virality_justification, monetization_strategy, video_format, hashtags, \
          trend_analysis, region, channel_inspirations, user_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING {IDEA_COLUMNS}"
    );

    let row = sqlx::query_as::<_, IdeaRow>(&query)
        .bind(idea.id)
        .bind(&idea.title)
        .bind(&idea.concept)
        .bind(enum_to_wire(&idea.platform))
        .bind(enum_to_wire(&idea.content_type))
        .bind(i16::from(idea.virality_score))
        .bind(&idea.virality_justification)
        .bind(&idea.monetization_strategy)
        .bind(serde_json::to_value(&idea.video_format).unwrap_or_default())
        .bind(&idea.hashtags)
        .bind(serde_json::to_value(&idea.trend_analysis).unwrap_or_default())
        .bind(idea.region.as_str())
        .bind(idea.channel_inspirations.as_deref())
        .bind(user_id)
        .bind(idea.created_at)
        .fetch_one(pool)
        .await
        .map_err(map_sqlx_error)?;

    Ok(row)
}

/// Returns all ideas owned by `user_id`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Unprovisioned`] when the table is missing, or
/// [`DbError::Sqlx`] on any other query failure.
pub async fn list_ideas_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<IdeaRow>, DbError> {
    let query = format!(
        "SELECT {IDEA_COLUMNS} FROM video_ideas WHERE user_id = $1 ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, IdeaRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)
}

/// Returns the `limit` most recently saved ideas across all users.
///
/// # Errors
///
/// Returns [`DbError::Unprovisioned`] when the table is missing, or
/// [`DbError::Sqlx`] on any other query failure.
pub async fn list_recent_ideas(pool: &PgPool, limit: i64) -> Result<Vec<IdeaRow>, DbError> {
    let query =
        format!("SELECT {IDEA_COLUMNS} FROM video_ideas ORDER BY created_at DESC LIMIT $1");
    sqlx::query_as::<_, IdeaRow>(&query)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)
}

/// Deletes an idea scoped to `(id, user_id)` and returns the affected row
/// count. A zero-row match (foreign owner or unknown id) is not an error;
/// user scoping is enforced by the row filter itself.
///
/// # Errors
///
/// Returns [`DbError::Unprovisioned`] when the table is missing, or
/// [`DbError::Sqlx`] on any other query failure.
pub async fn delete_idea(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM video_ideas WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    Ok(result.rows_affected())
}
