use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::document::{Document, Mutation, NoopReason, Outcome};
use crate::editor::session::{Session, SessionSnapshot};
use crate::errors::AppError;
use crate::preview::RenderTree;
use crate::state::AppState;

#[derive(Serialize)]
pub struct MutationResponse {
    pub document: Document,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noop_reason: Option<NoopReason>,
}

pub(crate) fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Session>, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let session = state.sessions.create();
    (StatusCode::CREATED, Json(session.snapshot()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(find_session(&state, id)?.snapshot()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/mutations
///
/// A rejected mutation is not an error: the response is still 200 with
/// `applied: false` and the unchanged document.
pub async fn handle_apply_mutation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<Mutation>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = find_session(&state, id)?;
    let Json(mutation) = payload?;
    let result = session.apply(&mutation);
    let noop_reason = match result.outcome {
        Outcome::Applied => None,
        Outcome::Noop(reason) => Some(reason),
    };
    Ok(Json(MutationResponse {
        document: result.document,
        applied: noop_reason.is_none(),
        noop_reason,
    }))
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderTree>, AppError> {
    Ok(Json(find_session(&state, id)?.mount_preview()))
}

/// DELETE /api/v1/sessions/:id/preview
pub async fn handle_unmount_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    find_session(&state, id)?.unmount_preview();
    Ok(StatusCode::NO_CONTENT)
}
