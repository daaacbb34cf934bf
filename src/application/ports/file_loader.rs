use async_trait::async_trait;

use crate::domain::{ExtractedText, ExtractionLimits, UploadedDocument};

#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
        limits: &ExtractionLimits,
    ) -> Result<ExtractedText, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("empty input")]
    EmptyInput,
    #[error("file too large: {size} bytes exceeds {max} bytes")]
    FileTooLarge { size: usize, max: usize },
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("invalid file header: {0}")]
    InvalidHeader(String),
    #[error("document is encrypted")]
    Encrypted,
    #[error("invalid package: {0}")]
    InvalidPackage(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}
