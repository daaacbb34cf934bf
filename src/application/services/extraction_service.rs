use std::sync::Arc;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{
    ContentType, ExtractionDiagnostic, ExtractionLimits, ExtractionResult, UploadedDocument,
};

/// The never-throw boundary between file parsing and prompt assembly.
///
/// Every failure below this point is absorbed and turned into either an empty
/// string or a sentinel naming the problem, so a bad upload never blocks the
/// question it came with.
pub struct TextExtractionService<F: ?Sized>
where
    F: FileLoader,
{
    file_loader: Arc<F>,
    limits: ExtractionLimits,
}

impl<F: ?Sized> TextExtractionService<F>
where
    F: FileLoader,
{
    pub fn new(file_loader: Arc<F>, limits: ExtractionLimits) -> Self {
        Self {
            file_loader,
            limits,
        }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    pub async fn extract(&self, data: &[u8], mime: &str, filename: &str) -> ExtractionResult {
        self.extract_with_limits(data, mime, filename, &self.limits)
            .await
    }

    pub async fn extract_text(&self, data: &[u8], mime: &str) -> String {
        self.extract(data, mime, "upload").await.text
    }

    #[tracing::instrument(skip(self, data, limits), fields(bytes = data.len()))]
    pub async fn extract_with_limits(
        &self,
        data: &[u8],
        mime: &str,
        filename: &str,
        limits: &ExtractionLimits,
    ) -> ExtractionResult {
        if data.is_empty() {
            tracing::warn!("Zero-length upload");
            return ExtractionResult::diagnostic(
                ExtractionDiagnostic::EmptyInput,
                limits.max_chars,
            );
        }

        let Some(content_type) = ContentType::from_mime(mime) else {
            tracing::warn!("Unsupported content type");
            return ExtractionResult::diagnostic(
                ExtractionDiagnostic::UnsupportedType,
                limits.max_chars,
            );
        };

        if data.len() > limits.max_file_bytes {
            tracing::warn!(max_file_bytes = limits.max_file_bytes, "Upload exceeds size limit");
            return ExtractionResult::diagnostic(
                ExtractionDiagnostic::FileTooLarge,
                limits.max_chars,
            );
        }

        let document = UploadedDocument::new(filename.to_string(), content_type, data.len() as u64);

        match self.file_loader.extract_text(data, &document, limits).await {
            Ok(extracted) => {
                let result = ExtractionResult::from_extracted(extracted, limits.max_chars);
                tracing::info!(
                    document_id = %document.id.as_uuid(),
                    method = %result.method,
                    chars = result.text.chars().count(),
                    truncated = result.truncated,
                    fallback_attempted = result.fallback_attempted,
                    "Extraction complete"
                );
                result
            }
            Err(e) => {
                let diagnostic = diagnose(&e, content_type);
                tracing::warn!(
                    document_id = %document.id.as_uuid(),
                    error = %e,
                    diagnostic = ?diagnostic,
                    "Extraction produced a diagnostic"
                );
                ExtractionResult::diagnostic(diagnostic, limits.max_chars)
            }
        }
    }
}

fn diagnose(error: &FileLoaderError, content_type: ContentType) -> ExtractionDiagnostic {
    match error {
        FileLoaderError::EmptyInput => ExtractionDiagnostic::EmptyInput,
        FileLoaderError::FileTooLarge { .. } => ExtractionDiagnostic::FileTooLarge,
        FileLoaderError::UnsupportedContentType(_) => ExtractionDiagnostic::UnsupportedType,
        FileLoaderError::Encrypted => ExtractionDiagnostic::EncryptedPdf,
        FileLoaderError::InvalidHeader(_) | FileLoaderError::InvalidPackage(_) => {
            match content_type {
                ContentType::Pdf => ExtractionDiagnostic::InvalidPdfHeader,
                ContentType::Docx => ExtractionDiagnostic::InvalidDocx,
                _ => ExtractionDiagnostic::InvalidImage,
            }
        }
        FileLoaderError::ExtractionFailed(_) => match content_type {
            ContentType::Pdf => ExtractionDiagnostic::PdfExtractionFailed,
            ContentType::Docx => ExtractionDiagnostic::DocxExtractionFailed,
            _ => ExtractionDiagnostic::ExtractionFailed,
        },
    }
}
