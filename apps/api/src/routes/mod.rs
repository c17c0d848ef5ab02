pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::editor::handlers as editor;
use crate::export::handlers as export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Editing sessions
        .route("/api/v1/sessions", post(editor::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(editor::handle_get_session).delete(editor::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/mutations",
            post(editor::handle_apply_mutation),
        )
        .route(
            "/api/v1/sessions/:id/preview",
            get(editor::handle_get_preview).delete(editor::handle_unmount_preview),
        )
        // Export
        .route("/api/v1/sessions/:id/export", post(export::handle_export))
        .route(
            "/api/v1/sessions/:id/export/status",
            get(export::handle_export_status),
        )
        // Remote analysis
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .route("/api/v1/analysis/summary", post(analysis::handle_summary))
        .with_state(state)
}
