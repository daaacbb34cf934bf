use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::OcrEngine;
use crate::presentation::config::{OcrProvider, OcrSettings};

use super::tesseract_engine::TesseractOcrEngine;
use super::vlm_ocr_engine::VlmOcrEngine;

#[derive(Debug, thiserror::Error)]
pub enum OcrEngineFactoryError {
    #[error("vlm_base_url is required for the vision OCR provider")]
    MissingVlmBaseUrl,
    #[error("vlm_model is required for the vision OCR provider")]
    MissingVlmModel,
    #[error("ocr engine initialization failed: {0}")]
    InitializationFailed(String),
}

pub struct OcrEngineFactory;

impl OcrEngineFactory {
    /// `Ok(None)` when OCR is switched off.
    pub fn create(
        settings: &OcrSettings,
    ) -> Result<Option<Arc<dyn OcrEngine>>, OcrEngineFactoryError> {
        match settings.provider {
            OcrProvider::Disabled => {
                tracing::info!("OCR disabled; scanned PDFs and images will yield no text");
                Ok(None)
            }
            OcrProvider::Tesseract => {
                tracing::info!(
                    binary = %settings.tesseract_path,
                    language = %settings.language,
                    "Using Tesseract OCR engine"
                );
                Ok(Some(Arc::new(TesseractOcrEngine::new(
                    &settings.tesseract_path,
                    &settings.language,
                    Duration::from_secs(settings.timeout_secs),
                ))))
            }
            OcrProvider::Vlm => {
                let base_url = settings
                    .vlm_base_url
                    .as_deref()
                    .ok_or(OcrEngineFactoryError::MissingVlmBaseUrl)?;
                let model = settings
                    .vlm_model
                    .as_deref()
                    .ok_or(OcrEngineFactoryError::MissingVlmModel)?;
                let api_key = settings.vlm_api_key.as_deref().unwrap_or("lm-studio");
                tracing::info!(model, base_url, "Using vision-model OCR engine");
                let engine = VlmOcrEngine::new(base_url, model, api_key)
                    .map_err(|e| OcrEngineFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Some(Arc::new(engine)))
            }
        }
    }
}
