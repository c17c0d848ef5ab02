//! Client for the remote resume-analysis service.
//!
//! The service is a black box: one multipart POST per call, a JSON body back.
//! Calls are single-attempt; callers map any failure to a fixed user-facing
//! message and no local state is touched.

pub mod handlers;
pub mod models;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::analysis::models::{AnalysisResponse, ResumeSummary, SummaryResponse};

pub const ANALYZE_FAILED: &str = "Failed to analyze resume. Please try again.";
pub const SUMMARY_FAILED: &str = "Failed to get summary. Please try again.";

/// File extensions the service accepts.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An uploaded resume file.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Lower-cased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }

    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Remote analysis operations. Carried in `AppState` as `Arc<dyn ResumeAnalyzer>`.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        file: UploadedFile,
        job_description: Option<String>,
    ) -> Result<AnalysisResponse, RemoteError>;

    async fn summarize(&self, file: UploadedFile) -> Result<ResumeSummary, RemoteError>;
}

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the analysis service")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn file_part(file: UploadedFile) -> Result<Part, RemoteError> {
        let part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
        match file.content_type {
            Some(ct) => Ok(part.mime_str(&ct)?),
            None => Ok(part),
        }
    }

    /// One POST, no retry.
    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, RemoteError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        debug!(url = %url, status = status.as_u16(), "Analysis service responded");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ResumeAnalyzer for AnalysisClient {
    async fn analyze(
        &self,
        file: UploadedFile,
        job_description: Option<String>,
    ) -> Result<AnalysisResponse, RemoteError> {
        let form = Form::new()
            .part("file", Self::file_part(file)?)
            .text("job_description", job_description.unwrap_or_default());
        self.post_form("/analyze", form).await
    }

    async fn summarize(&self, file: UploadedFile) -> Result<ResumeSummary, RemoteError> {
        let form = Form::new().part("file", Self::file_part(file)?);
        let response: SummaryResponse = self.post_form("/resume_summary", form).await?;
        Ok(ResumeSummary::from(response.summary))
    }
}

/// Pulls `{"error": "..."}` out of an error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
