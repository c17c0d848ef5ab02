mod analysis;
mod config;
mod document;
mod editor;
mod errors;
mod export;
mod layout;
mod preview;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::editor::SessionStore;
use crate::export::{ExportPipeline, ExportSettings, PdfEncoder, SvgRasterizer};
use crate::layout::PageFormat;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize analysis client
    let analyzer = AnalysisClient::new(&config.analysis_service_url, config.analysis_timeout())?;
    info!("Analysis client initialized ({})", config.analysis_service_url);

    // Initialize export pipeline (font database loading is blocking)
    let font_dir = config.export_font_dir.clone();
    let rasterizer = tokio::task::spawn_blocking(move || SvgRasterizer::new(font_dir.as_deref())).await?;
    info!("Rasterizer initialized with {} font faces", rasterizer.font_count());

    let settings = ExportSettings {
        scale: config.export_scale,
        page: PageFormat::LETTER,
        font: config.export_font,
    };
    info!(
        "Export settings: {:?} at {}x on {}x{}in",
        settings.font, settings.scale, settings.page.width_in, settings.page.height_in
    );
    let exporter = ExportPipeline::new(
        Arc::new(rasterizer),
        Arc::new(PdfEncoder::new(config.export_jpeg_quality)),
        settings,
    );

    // Build app state
    let state = AppState {
        sessions: SessionStore::new(),
        analyzer: Arc::new(analyzer),
        exporter: Arc::new(exporter),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
