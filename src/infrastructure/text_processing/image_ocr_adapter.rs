use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError, OcrEngine};
use crate::domain::{ExtractedText, ExtractionLimits, ExtractionMethod, UploadedDocument};
use crate::infrastructure::ocr::recognize_images;

use super::text_sanitizer::sanitize_extracted_text;

/// OCR straight on PNG, JPEG or WEBP bytes. There is no text layer to try first.
pub struct ImageOcrAdapter {
    engine: Arc<dyn OcrEngine>,
}

impl ImageOcrAdapter {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl FileLoader for ImageOcrAdapter {
    #[tracing::instrument(
        skip(self, data, _limits),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
        _limits: &ExtractionLimits,
    ) -> Result<ExtractedText, FileLoaderError> {
        if !document.content_type.is_image() {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        if data.is_empty() {
            return Err(FileLoaderError::EmptyInput);
        }

        if !document.content_type.has_signature(data) {
            return Err(FileLoaderError::InvalidHeader(format!(
                "bytes are not {}",
                document.content_type.as_mime()
            )));
        }

        let text = match recognize_images(self.engine.as_ref(), &[data.to_vec()]).await {
            Ok(texts) => sanitize_extracted_text(&texts.join("\n")),
            Err(e) => {
                tracing::warn!(error = %e, "Image OCR failed, returning empty text");
                String::new()
            }
        };

        Ok(ExtractedText::new(text, ExtractionMethod::ImageOcr))
    }
}
