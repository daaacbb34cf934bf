use std::sync::Arc;

use async_trait::async_trait;
use lopdf::Document as PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError, OcrEngine, PageRasterizer};
use crate::domain::{
    ContentType, ExtractedText, ExtractionLimits, ExtractionMethod, PageText, UploadedDocument,
};
use crate::infrastructure::ocr::recognize_images;

use super::blocking::run_blocking;
use super::text_sanitizer::{collapse_whitespace, sanitize_extracted_text};

/// Text-layer extraction with an optional OCR pass over rendered pages.
#[derive(Default)]
pub struct PdfAdapter {
    ocr_fallback: Option<OcrFallback>,
}

struct OcrFallback {
    rasterizer: Arc<dyn PageRasterizer>,
    engine: Arc<dyn OcrEngine>,
}

struct TextLayer {
    pages: Vec<PageText>,
    total_pages: usize,
}

impl PdfAdapter {
    pub fn new() -> Self {
        Self { ocr_fallback: None }
    }

    pub fn with_ocr_fallback(
        mut self,
        rasterizer: Arc<dyn PageRasterizer>,
        engine: Arc<dyn OcrEngine>,
    ) -> Self {
        self.ocr_fallback = Some(OcrFallback { rasterizer, engine });
        self
    }

    fn check_structure(data: &[u8]) -> Result<(), FileLoaderError> {
        if data.is_empty() {
            return Err(FileLoaderError::EmptyInput);
        }

        if !ContentType::Pdf.has_signature(data) {
            return Err(FileLoaderError::InvalidHeader(
                "missing %PDF- magic header".to_string(),
            ));
        }

        Ok(())
    }

    /// Parses the document, opening owner-password-only files with the empty
    /// user password. Anything that needs a real user password is `Encrypted`.
    fn open(data: &[u8]) -> Result<PdfDocument, FileLoaderError> {
        let mut doc = PdfDocument::load_mem(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                tracing::info!(error = %e, "PDF cannot be opened without a user password");
                FileLoaderError::Encrypted
            })?;
            tracing::debug!("Opened encrypted PDF with the empty user password");
        }

        Ok(doc)
    }

    fn extract_pages(data: &[u8], max_pages: usize) -> Result<TextLayer, FileLoaderError> {
        let doc = Self::open(data)?;

        let page_numbers = doc.get_pages();
        let total_pages = page_numbers.len();
        let mut pages = Vec::with_capacity(total_pages.min(max_pages));

        for &page_number in page_numbers.keys().take(max_pages) {
            match doc.extract_text(&[page_number]) {
                Ok(raw) => {
                    let text = collapse_whitespace(&raw);
                    if !text.is_empty() {
                        pages.push(PageText { page_number, text });
                    }
                }
                Err(e) => {
                    tracing::warn!(page_number, error = %e, "Skipping page with unreadable text layer");
                }
            }
        }

        Ok(TextLayer { pages, total_pages })
    }

    async fn run_ocr(ocr: &OcrFallback, data: &[u8], limits: &ExtractionLimits) -> String {
        let rasterizer = Arc::clone(&ocr.rasterizer);
        let data_owned = data.to_vec();
        let max_pages = limits.max_pages;

        let images = match run_blocking(limits.parse_timeout, "PDF rasterization", move || {
            rasterizer.rasterize(&data_owned, max_pages)
        })
        .await
        {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(error = %e, "PDF rasterization failed, OCR yields nothing");
                return String::new();
            }
        };

        if images.is_empty() {
            return String::new();
        }

        match recognize_images(ocr.engine.as_ref(), &images).await {
            Ok(texts) => texts
                .iter()
                .map(|t| sanitize_extracted_text(t))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                tracing::warn!(error = %e, "OCR engine unavailable, OCR yields nothing");
                String::new()
            }
        }
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data, limits),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
        limits: &ExtractionLimits,
    ) -> Result<ExtractedText, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        Self::check_structure(data)?;

        let data_owned = data.to_vec();
        let max_pages = limits.max_pages;
        let primary = run_blocking(limits.parse_timeout, "PDF text extraction", move || {
            Self::extract_pages(&data_owned, max_pages)
        })
        .await;

        let (text_layer, total_pages, primary_error) = match primary {
            Ok(layer) => (PageText::join(&layer.pages), Some(layer.total_pages), None),
            Err(FileLoaderError::Encrypted) => return Err(FileLoaderError::Encrypted),
            Err(e) => {
                tracing::warn!(error = %e, "PDF text layer extraction failed");
                (String::new(), None, Some(e))
            }
        };

        let layer_chars = text_layer.trim().chars().count();
        tracing::info!(
            total_pages = ?total_pages,
            layer_chars,
            threshold = limits.ocr_min_chars,
            "PDF text layer read"
        );

        let with_pages = |extracted: ExtractedText| match total_pages {
            Some(n) => extracted.with_page_count(n),
            None => extracted,
        };

        if primary_error.is_none() && layer_chars >= limits.ocr_min_chars {
            return Ok(with_pages(ExtractedText::new(
                text_layer,
                ExtractionMethod::TextLayer,
            )));
        }

        let Some(ocr) = &self.ocr_fallback else {
            return match primary_error {
                Some(e) => Err(e),
                None => Ok(with_pages(ExtractedText::new(
                    text_layer,
                    ExtractionMethod::TextLayer,
                ))),
            };
        };

        tracing::info!("Text layer below confidence threshold, falling back to OCR");
        let ocr_text = Self::run_ocr(ocr, data, limits).await;

        let extracted = if !ocr_text.trim().is_empty() {
            ExtractedText::new(ocr_text, ExtractionMethod::OcrFallback)
        } else if layer_chars > 0 {
            tracing::info!("OCR produced nothing, keeping sparse text layer");
            ExtractedText::new(text_layer, ExtractionMethod::TextLayer)
        } else {
            ExtractedText::new(String::new(), ExtractionMethod::OcrFallback)
        };

        Ok(with_pages(extracted.with_fallback_attempted(true)))
    }
}
