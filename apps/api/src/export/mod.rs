// Export pipeline: mounted preview surface -> print copy -> column -> bitmap -> pages -> PDF.
//
// Stages after the precondition check run on blocking workers. The session's
// ExportControl is held disabled through a BusyGuard owned by the blocking worker.

pub mod control;
pub mod encode;
pub mod handlers;
pub mod paginate;
pub mod print;
pub mod raster;

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

use crate::layout::{flow, FontFamily, PageFormat};
use crate::preview::Node;

pub use control::ExportControl;
pub use encode::{artifact_filename, DocumentMeta, PageEncoder, PdfEncoder};
pub use raster::{Rasterizer, SvgRasterizer};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Resume preview not found")]
    PreviewNotFound,

    #[error("An export is already in progress")]
    InProgress,

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Pagination failed: {0}")]
    Paginate(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Export worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Pixels per point. Never below 2.0.
    pub scale: f32,
    pub page: PageFormat,
    pub font: FontFamily,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            page: PageFormat::LETTER,
            font: FontFamily::ComputerModern,
        }
    }
}

/// A finished, downloadable document.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Bytes,
    pub pages: usize,
}

pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    encoder: Arc<dyn PageEncoder>,
    settings: ExportSettings,
}

impl ExportPipeline {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        encoder: Arc<dyn PageEncoder>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            rasterizer,
            encoder,
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Runs the full pipeline against a mounted surface.
    ///
    /// Fails with `PreviewNotFound` before touching `control` when nothing is
    /// mounted, and with `InProgress` when another export holds the control.
    ///
    /// The busy guard moves into the blocking worker, so the control stays
    /// disabled until the worker finishes even if this future is dropped
    /// (for example when the client disconnects mid-export).
    pub async fn run(
        &self,
        control: &Arc<ExportControl>,
        surface: Option<Arc<Node>>,
        owner: Option<String>,
    ) -> Result<ExportArtifact, ExportError> {
        let surface = surface.ok_or(ExportError::PreviewNotFound)?;
        let guard = control.try_disable().ok_or(ExportError::InProgress)?;
        let started = Instant::now();

        let sheet = print::PrintStylesheet::new(self.settings.font.svg_family());
        let printed = print::prepare(&surface, &sheet);
        drop(surface);

        let settings = self.settings.clone();
        let rasterizer = Arc::clone(&self.rasterizer);
        let encoder = Arc::clone(&self.encoder);
        let meta = DocumentMeta {
            title: owner.clone().unwrap_or_else(|| "Resume".to_string()),
            page: self.settings.page,
        };

        let (bytes, page_count) = tokio::task::spawn_blocking(move || {
            let _guard = guard;

            let column = flow(&printed, settings.font, settings.page.printable_width_pt());
            let bitmap = rasterizer.rasterize(&column, settings.scale)?;
            let breaks = paginate::page_breaks(&column, settings.page.printable_height_pt());
            let pages = paginate::compose_pages(&bitmap, &breaks, settings.page, settings.scale)?;
            debug!(
                stage = "rasterize",
                pages = pages.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Pages composed"
            );

            let bytes = encoder.encode(&pages, &meta)?;
            Ok::<_, ExportError>((bytes, pages.len()))
        })
        .await
        .map_err(|e| ExportError::Worker(e.to_string()))??;

        let filename = artifact_filename(owner.as_deref());
        info!(
            pages = page_count,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Export finished: {filename}"
        );
        Ok(ExportArtifact {
            filename,
            bytes: Bytes::from(bytes),
            pages: page_count,
        })
    }
}

#[cfg(test)]
pub mod test_support {
    use image::{Rgba, RgbaImage};

    use super::raster::pixel_size;
    use super::*;
    use crate::layout::Column;

    /// Paints a white bitmap of the right size without touching fonts.
    pub struct BlankRasterizer;

    impl Rasterizer for BlankRasterizer {
        fn rasterize(&self, column: &Column, scale: f32) -> Result<RgbaImage, ExportError> {
            let (w, h) = pixel_size(column, scale);
            Ok(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
        }
    }

    pub struct FailingEncoder;

    impl PageEncoder for FailingEncoder {
        fn encode(
            &self,
            _pages: &[image::RgbImage],
            _meta: &DocumentMeta,
        ) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Encode("disk on fire".to_string()))
        }
    }

    pub fn pipeline_with(encoder: Arc<dyn PageEncoder>) -> ExportPipeline {
        ExportPipeline::new(Arc::new(BlankRasterizer), encoder, ExportSettings::default())
    }
}
