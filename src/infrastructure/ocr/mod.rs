mod ocr_engine_factory;
mod ocr_session;
mod tesseract_engine;
mod vlm_ocr_engine;

pub use ocr_engine_factory::{OcrEngineFactory, OcrEngineFactoryError};
pub use ocr_session::recognize_images;
pub use tesseract_engine::TesseractOcrEngine;
pub use vlm_ocr_engine::{OCR_PROMPT, VlmOcrEngine};
