//! Rasterization of a laid-out column.
//!
//! The column is serialized to SVG (1 user unit = 1pt) and rendered with resvg at
//! `scale` pixels per point. Runs synchronously; call from a blocking worker.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use image::{ImageBuffer, RgbaImage};
use resvg::tiny_skia::{self, Pixmap};
use resvg::usvg::{fontdb, Options, Tree};
use tracing::info;

use crate::export::ExportError;
use crate::layout::Column;

/// Turns a laid-out column into a bitmap.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, column: &Column, scale: f32) -> Result<RgbaImage, ExportError>;
}

/// resvg-backed rasterizer. The font database is loaded once and shared.
pub struct SvgRasterizer {
    fonts: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    /// Loads system fonts, plus every font file under `font_dir` when given.
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            db.load_fonts_dir(dir);
        }
        info!(faces = db.len(), "Rasterizer font database loaded");
        Self {
            fonts: Arc::new(db),
        }
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, column: &Column, scale: f32) -> Result<RgbaImage, ExportError> {
        let svg = to_svg(column);

        let mut options = Options::default();
        options.fontdb = Arc::clone(&self.fonts);
        let tree = Tree::from_str(&svg, &options)
            .map_err(|e| ExportError::Rasterize(format!("invalid SVG: {e}")))?;

        let (width, height) = pixel_size(column, scale);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ExportError::Rasterize(format!("cannot allocate {width}x{height} pixmap"))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        ImageBuffer::from_raw(width, height, pixmap.take())
            .ok_or_else(|| ExportError::Rasterize("pixmap size mismatch".to_string()))
    }
}

/// Bitmap size for a column. An empty column still renders one point of height.
pub fn pixel_size(column: &Column, scale: f32) -> (u32, u32) {
    let width = (column.width_pt * scale).ceil().max(1.0) as u32;
    let height = (column.height_pt.max(1.0) * scale).ceil() as u32;
    (width, height)
}

/// SVG document for a column.
pub fn to_svg(column: &Column) -> String {
    let height = column.height_pt.max(1.0);
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = column.width_pt,
        h = height,
    );
    let _ = write!(
        svg,
        r#"<rect width="{}" height="{}" fill="{}"/>"#,
        column.width_pt,
        height,
        escape(&column.background)
    );
    let family = escape(column.font.svg_family());

    for rule in &column.rules {
        let _ = write!(
            svg,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{}" stroke-width="0.75"/>"#,
            rule.x0_pt,
            rule.x1_pt,
            escape(&rule.color),
            y = rule.y_pt,
        );
    }

    for line in &column.lines {
        for run in &line.runs {
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}" xml:space="preserve">{}</text>"#,
                run.x_pt,
                line.baseline_pt,
                family,
                run.size_pt,
                if run.bold { "bold" } else { "normal" },
                escape(&run.color),
                escape(&run.text),
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
