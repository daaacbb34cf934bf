use async_trait::async_trait;

/// Hands out OCR workers. A worker is scoped to a single extraction call.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, OcrError>;
}

#[async_trait]
pub trait OcrWorker: Send {
    /// `image` is PNG, JPEG or WEBP bytes.
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrError>;

    fn release(self: Box<Self>);
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr engine unavailable: {0}")]
    Unavailable(String),
    #[error("ocr worker startup failed: {0}")]
    StartupFailed(String),
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
    #[error("recognition timed out")]
    Timeout,
}
