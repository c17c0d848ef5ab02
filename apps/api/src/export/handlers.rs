use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::editor::handlers::find_session;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ExportStatus {
    pub enabled: bool,
}

/// POST /api/v1/sessions/:id/export
///
/// Returns the PDF as an attachment named after the document owner.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = find_session(&state, id)?;
    let (surface, owner) = session.export_input();

    let artifact = state
        .exporter
        .run(session.export_control(), surface, owner)
        .await
        .map_err(|e| {
            warn!(session_id = %id, "Export failed: {e}");
            AppError::from(e)
        })?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// GET /api/v1/sessions/:id/export/status
pub async fn handle_export_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportStatus>, AppError> {
    let session = find_session(&state, id)?;
    Ok(Json(ExportStatus {
        enabled: session.export_control().is_enabled(),
    }))
}
