use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::application::ports::{FileLoaderError, PageRasterizer};

pub const DEFAULT_RENDER_DPI: f32 = 150.0;

/// Renders pages with the system pdfium library, bound afresh for every call.
pub struct PdfiumRasterizer {
    render_dpi: f32,
}

impl PdfiumRasterizer {
    pub fn new(render_dpi: f32) -> Self {
        Self { render_dpi }
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_DPI)
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, data: &[u8], max_pages: usize) -> Result<Vec<Vec<u8>>, FileLoaderError> {
        let pdfium = Pdfium::new(
            Pdfium::bind_to_system_library().map_err(|e| {
                FileLoaderError::ExtractionFailed(format!("pdfium bind failed: {e}"))
            })?,
        );

        let doc = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("pdfium open failed: {e}")))?;

        let page_count = doc.pages().len() as usize;
        let pages_to_render = page_count.min(max_pages);

        let mut png_buffers: Vec<Vec<u8>> = Vec::with_capacity(pages_to_render);

        for index in 0..pages_to_render {
            match self.render_page(&doc, index) {
                Ok(png) => png_buffers.push(png),
                Err(e) => tracing::warn!(page_index = index, error = %e, "Skipping page that failed to render"),
            }
        }

        tracing::debug!(
            page_count,
            rendered = png_buffers.len(),
            "PDF rasterization complete"
        );

        Ok(png_buffers)
    }
}

impl PdfiumRasterizer {
    fn render_page(&self, doc: &PdfDocument<'_>, index: usize) -> Result<Vec<u8>, FileLoaderError> {
        let page = doc.pages().get(index as u16).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("page {index} access failed: {e}"))
        })?;

        let width = (page.width().value * self.render_dpi / 72.0) as i32;
        let height = (page.height().value * self.render_dpi / 72.0) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .map_err(|e| {
                FileLoaderError::ExtractionFailed(format!("render page {index} failed: {e}"))
            })?;

        let dynamic_image = bitmap.as_image();
        let mut png_bytes: Vec<u8> = Vec::new();
        dynamic_image
            .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| {
                FileLoaderError::ExtractionFailed(format!("PNG encode page {index} failed: {e}"))
            })?;

        Ok(png_bytes)
    }
}
