use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;

use crate::application::ports::{OcrEngine, OcrError, OcrWorker};

/// OCR through the `tesseract` command-line binary.
pub struct TesseractOcrEngine {
    binary: PathBuf,
    language: String,
    timeout: Duration,
}

impl TesseractOcrEngine {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            timeout,
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcrEngine {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        let scratch = tempfile::Builder::new()
            .prefix("ocr-worker-")
            .tempdir()
            .map_err(|e| OcrError::StartupFailed(format!("scratch dir: {e}")))?;

        tracing::debug!(scratch = %scratch.path().display(), "Tesseract worker started");

        Ok(Box::new(TesseractWorker {
            scratch,
            binary: self.binary.clone(),
            language: self.language.clone(),
            timeout: self.timeout,
            images_seen: 0,
        }))
    }
}

/// Owns a scratch directory that disappears with the worker.
struct TesseractWorker {
    scratch: TempDir,
    binary: PathBuf,
    language: String,
    timeout: Duration,
    images_seen: usize,
}

#[async_trait]
impl OcrWorker for TesseractWorker {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrError> {
        let input = self.scratch.path().join(format!("image-{}", self.images_seen));
        self.images_seen += 1;

        tokio::fs::write(&input, image)
            .await
            .map_err(|e| OcrError::RecognitionFailed(format!("write image: {e}")))?;

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.binary)
                .arg(&input)
                .arg("stdout")
                .arg("-l")
                .arg(&self.language)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| OcrError::Timeout)?
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                OcrError::Unavailable(format!("{} not found", self.binary.display()))
            }
            _ => OcrError::RecognitionFailed(format!("spawn tesseract: {e}")),
        })?;

        tokio::fs::remove_file(&input).await.ok();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RecognitionFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn release(self: Box<Self>) {
        let images = self.images_seen;
        if let Err(e) = self.scratch.close() {
            tracing::warn!(error = %e, "Failed to remove OCR scratch directory");
        }
        tracing::debug!(images, "Tesseract worker released");
    }
}
