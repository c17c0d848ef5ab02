//! Slices a rendered column into fixed-size pages.

use image::{imageops, DynamicImage, Rgb, RgbImage, RgbaImage};

use crate::export::ExportError;
use crate::layout::{Column, PageFormat};

/// Vertical slices of the column, in points, each at most `printable_height_pt` tall.
///
/// A slice ends at the last line boundary that fits. When a single line is taller
/// than a page the slice is cut hard at the page height. Always returns at least
/// one slice, so an empty column still exports one blank page.
pub fn page_breaks(column: &Column, printable_height_pt: f32) -> Vec<(f32, f32)> {
    let total = column.height_pt;
    if total <= 0.0 || printable_height_pt <= 0.0 {
        return vec![(0.0, total.max(0.0))];
    }

    let mut slices = Vec::new();
    let mut start = 0.0_f32;
    while start < total {
        let limit = start + printable_height_pt;
        if limit >= total {
            slices.push((start, total));
            break;
        }
        let snapped = column
            .lines
            .iter()
            .map(|l| l.top_pt)
            .filter(|&top| top > start && top <= limit)
            .fold(None, |best: Option<f32>, top| Some(best.map_or(top, |b| b.max(top))));
        let end = snapped.unwrap_or(limit);
        slices.push((start, end));
        start = end;
    }
    slices
}

/// Crops each slice out of `bitmap` and places it on a white page at the margin.
///
/// `bitmap` is the column rendered at `scale` pixels per point.
pub fn compose_pages(
    bitmap: &RgbaImage,
    breaks: &[(f32, f32)],
    page: PageFormat,
    scale: f32,
) -> Result<Vec<RgbImage>, ExportError> {
    let page_w = (page.width_pt() * scale).round() as u32;
    let page_h = (page.height_pt() * scale).round() as u32;
    let margin = (page.margin_pt() * scale).round() as i64;
    let printable_w = (page.printable_width_pt() * scale).round() as u32;
    let printable_h = (page.printable_height_pt() * scale).round() as u32;

    if bitmap.width() > printable_w + 1 {
        return Err(ExportError::Paginate(format!(
            "content is {}px wide but the printable width is {printable_w}px",
            bitmap.width()
        )));
    }

    let mut pages = Vec::with_capacity(breaks.len());
    for &(start, end) in breaks {
        let y0 = ((start * scale).round() as u32).min(bitmap.height());
        let y1 = ((end * scale).round() as u32).clamp(y0, bitmap.height());
        let height = (y1 - y0).min(printable_h);

        let mut canvas = RgbImage::from_pixel(page_w, page_h, Rgb([255, 255, 255]));
        if height > 0 {
            let slice = imageops::crop_imm(bitmap, 0, y0, bitmap.width(), height).to_image();
            let slice = DynamicImage::ImageRgba8(slice).to_rgb8();
            imageops::overlay(&mut canvas, &slice, margin, margin);
        }
        pages.push(canvas);
    }
    Ok(pages)
}
