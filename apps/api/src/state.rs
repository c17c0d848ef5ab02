use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::editor::SessionStore;
use crate::export::ExportPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Remote analysis service. Default: AnalysisClient over HTTP.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub exporter: Arc<ExportPipeline>,
    pub config: Config,
}
