use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use videa_core::{IdeaRequest, VideoIdea};
use videa_ideas::IdeaError;

use super::{map_db_error, ApiError, AppState};
use crate::middleware::AuthError;

/// The public recent feed mirrors the original UI: three newest ideas.
const RECENT_LIMIT: i64 = 3;

#[derive(Debug, Serialize)]
pub(super) struct IdeasResponse {
    pub ideas: Vec<VideoIdea>,
}

#[derive(Debug, Serialize)]
pub(super) struct SaveResponse {
    pub success: bool,
    pub data: VideoIdea,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateResponse {
    pub idea: VideoIdea,
}

/// Resolves the caller's identity or rejects with a route-specific 401.
/// Auth always runs before any persistence or generation work.
async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
    message: &str,
) -> Result<Uuid, ApiError> {
    state
        .auth
        .user_id_from_headers(headers)
        .await
        .map_err(|e| {
            if let AuthError::Verification(reason) = &e {
                tracing::warn!(reason = %reason, "token verification errored");
            }
            ApiError::unauthorized(message)
        })
}

/// `GET /api/ideas`: all ideas owned by the caller, newest first.
pub(super) async fn list_ideas(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IdeasResponse>, ApiError> {
    let user_id = require_user(&state, &headers, "You must be logged in to view ideas").await?;

    let rows = videa_db::list_ideas_for_user(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(&e, "Failed to fetch ideas"))?;

    let ideas = rows
        .into_iter()
        .map(videa_db::IdeaRow::into_idea)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| map_db_error(&e, "Failed to fetch ideas"))?;

    Ok(Json(IdeasResponse { ideas }))
}

/// `POST /api/ideas`: persist a generated idea for the caller.
pub(super) async fn save_idea(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<VideoIdea>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let user_id = require_user(&state, &headers, "You must be logged in to save ideas").await?;

    let Ok(Json(idea)) = payload else {
        return Err(ApiError::bad_request("Invalid idea data provided"));
    };
    if idea.title.trim().is_empty() {
        return Err(ApiError::bad_request("Invalid idea data provided"));
    }

    let row = videa_db::insert_idea(&state.pool, &idea, user_id)
        .await
        .map_err(|e| map_db_error(&e, "Failed to save idea"))?;
    let data = row
        .into_idea()
        .map_err(|e| map_db_error(&e, "Failed to save idea"))?;

    Ok(Json(SaveResponse {
        success: true,
        data,
    }))
}

/// `DELETE /api/ideas/{id}`: delete an idea scoped to `(id, caller)`.
///
/// A zero-row match (foreign owner or unknown id) still succeeds: scoping
/// is enforced by the row filter, and the response does not reveal whether
/// the id exists for someone else.
pub(super) async fn delete_idea(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let user_id = require_user(&state, &headers, "Unauthorized").await?;

    let Ok(idea_id) = id.parse::<Uuid>() else {
        return Err(ApiError::bad_request("Invalid idea id"));
    };

    let affected = videa_db::delete_idea(&state.pool, idea_id, user_id)
        .await
        .map_err(|e| map_db_error(&e, "Failed to delete idea"))?;
    if affected == 0 {
        tracing::debug!(idea_id = %idea_id, "delete matched no rows");
    }

    Ok(Json(DeleteResponse { success: true }))
}

/// `POST /api/ideas/generate`: run the full synthesis pipeline for a
/// request. Open to unauthenticated callers; the result lands in the
/// rolling recent-ideas buffer either way.
pub(super) async fn generate_idea(
    State(state): State<AppState>,
    payload: Result<Json<IdeaRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Ok(Json(request)) = payload else {
        return Err(ApiError::bad_request("Invalid request body"));
    };

    let idea = state.synthesizer.generate(&request).await.map_err(|e| {
        tracing::error!(error = %e, "idea synthesis failed");
        match e {
            IdeaError::Trend(_) => ApiError::internal("Failed to fetch trending videos"),
            IdeaError::GenerationFailed => ApiError::internal(e.to_string()),
        }
    })?;

    state.recent_ideas.push(idea.clone()).await;

    Ok(Json(GenerateResponse { idea }))
}

/// `GET /api/ideas/recent`: the newest saved ideas, falling back to the
/// in-memory buffer when the store is unreachable. Never errors.
pub(super) async fn recent_ideas(State(state): State<AppState>) -> Json<IdeasResponse> {
    match videa_db::list_recent_ideas(&state.pool, RECENT_LIMIT).await {
        Ok(rows) => {
            let ideas: Vec<VideoIdea> = rows
                .into_iter()
                .filter_map(|row| row.into_idea().ok())
                .collect();
            Json(IdeasResponse { ideas })
        }
        Err(e) => {
            tracing::warn!(error = %e, "recent ideas query failed, serving in-memory buffer");
            Json(IdeasResponse {
                ideas: state.recent_ideas.snapshot().await,
            })
        }
    }
}
