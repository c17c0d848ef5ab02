use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::models::{AnalysisResponse, ResumeSummary};
use crate::analysis::{UploadedFile, ANALYZE_FAILED, SUMMARY_FAILED};
use crate::errors::AppError;
use crate::preview::summary::{project_summary, SummaryView};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SummaryEnvelope {
    pub summary: ResumeSummary,
    pub view: SummaryView,
}

struct AnalysisUpload {
    file: UploadedFile,
    job_description: Option<String>,
}

/// Reads the `file` and optional `job_description` parts of an upload form.
async fn read_upload(mut multipart: Multipart) -> Result<AnalysisUpload, AppError> {
    let mut file = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    if !file.has_allowed_extension() {
        return Err(AppError::Validation(
            "Only PDF and DOCX files are supported".to_string(),
        ));
    }
    Ok(AnalysisUpload {
        file,
        job_description,
    })
}

/// POST /api/v1/analysis
///
/// Forwards the resume and optional job description to the analysis service.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let file_name = upload.file.file_name.clone();

    let response = state
        .analyzer
        .analyze(upload.file, upload.job_description)
        .await
        .map_err(|e| {
            warn!(file = %file_name, "Resume analysis failed: {e}");
            AppError::RemoteRequest(ANALYZE_FAILED.to_string())
        })?;

    info!(
        file = %file_name,
        score = response.analysis.overall_score,
        "Resume analyzed"
    );
    Ok(Json(response))
}

/// POST /api/v1/analysis/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryEnvelope>, AppError> {
    let upload = read_upload(multipart).await?;
    let file_name = upload.file.file_name.clone();

    let summary = state.analyzer.summarize(upload.file).await.map_err(|e| {
        warn!(file = %file_name, "Resume summary failed: {e}");
        AppError::RemoteRequest(SUMMARY_FAILED.to_string())
    })?;

    let view = project_summary(&summary);
    Ok(Json(SummaryEnvelope { summary, view }))
}
