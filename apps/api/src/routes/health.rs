use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version, live session count
/// and the export settings in effect.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let export = state.exporter.settings();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "sessions": state.sessions.len(),
        "export": {
            "font": export.font,
            "scale": export.scale,
        },
        "analysis_service": state.config.analysis_service_url,
    }))
}
