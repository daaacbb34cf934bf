use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, ExtractedText, ExtractionLimits, ExtractionMethod, UploadedDocument};

const UTF8_BOM: &str = "\u{feff}";

pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
        _limits: &ExtractionLimits,
    ) -> Result<ExtractedText, FileLoaderError> {
        if document.content_type != ContentType::Text {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        if data.is_empty() {
            return Err(FileLoaderError::EmptyInput);
        }

        let decoded = String::from_utf8_lossy(data);
        let text = decoded.trim_start_matches(UTF8_BOM).trim();

        Ok(ExtractedText::new(text, ExtractionMethod::PlainText))
    }
}
