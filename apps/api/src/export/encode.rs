//! Assembles page bitmaps into a PDF.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::export::ExportError;
use crate::layout::PageFormat;

/// Metadata written into the artifact.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,
    pub page: PageFormat,
}

/// Encodes page bitmaps into a single downloadable document.
pub trait PageEncoder: Send + Sync {
    fn encode(&self, pages: &[RgbImage], meta: &DocumentMeta) -> Result<Vec<u8>, ExportError>;
}

/// One JPEG image per page, drawn full-bleed over the page's media box.
pub struct PdfEncoder {
    jpeg_quality: u8,
}

impl PdfEncoder {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}

const IMAGE_NAME: Name<'static> = Name(b"Im0");

impl PageEncoder for PdfEncoder {
    fn encode(&self, pages: &[RgbImage], meta: &DocumentMeta) -> Result<Vec<u8>, ExportError> {
        if pages.is_empty() {
            return Err(ExportError::Encode("no pages to encode".to_string()));
        }

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let info_id = alloc.bump();
        let page_ids: Vec<(Ref, Ref, Ref)> = pages
            .iter()
            .map(|_| (alloc.bump(), alloc.bump(), alloc.bump()))
            .collect();

        let width = meta.page.width_pt();
        let height = meta.page.height_pt();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|&(page_id, _, _)| page_id))
            .count(page_ids.len() as i32);
        pdf.document_info(info_id)
            .title(TextStr(&meta.title))
            .producer(TextStr(concat!("resume_api ", env!("CARGO_PKG_VERSION"))));

        for (bitmap, &(page_id, image_id, content_id)) in pages.iter().zip(&page_ids) {
            let jpeg = self.jpeg(bitmap)?;

            let mut image = pdf.image_xobject(image_id, &jpeg);
            image.filter(Filter::DctDecode);
            image.width(bitmap.width() as i32);
            image.height(bitmap.height() as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, width, height));
            page.parent(tree_id);
            page.contents(content_id);
            page.resources().x_objects().pair(IMAGE_NAME, image_id);
            page.finish();

            let mut content = Content::new();
            content.save_state();
            content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
            content.x_object(IMAGE_NAME);
            content.restore_state();
            pdf.stream(content_id, &content.finish());
        }

        Ok(pdf.finish())
    }
}

impl PdfEncoder {
    fn jpeg(&self, bitmap: &RgbImage) -> Result<Vec<u8>, ExportError> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
            .encode(
                bitmap.as_raw(),
                bitmap.width(),
                bitmap.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ExportError::Encode(format!("jpeg: {e}")))?;
        Ok(out)
    }
}

/// Download name for a document owner: `<name>.pdf`, or `resume.pdf` when there is
/// no usable name. Quotes, path separators and control characters are stripped.
pub fn artifact_filename(owner: Option<&str>) -> String {
    let cleaned: String = owner
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '/' | '\\') && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{cleaned}.pdf")
    }
}
