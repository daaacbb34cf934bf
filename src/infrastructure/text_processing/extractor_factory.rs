use std::sync::Arc;

use crate::application::ports::{FileLoader, PageRasterizer};
use crate::domain::ContentType;
use crate::infrastructure::ocr::{OcrEngineFactory, OcrEngineFactoryError};
use crate::presentation::config::OcrSettings;

use super::composite_file_loader::CompositeFileLoader;
use super::docx_adapter::DocxAdapter;
use super::image_ocr_adapter::ImageOcrAdapter;
use super::pdf_adapter::PdfAdapter;
use super::pdf_rasterizer::PdfiumRasterizer;
use super::plain_text_adapter::PlainTextAdapter;

#[derive(Debug, thiserror::Error)]
pub enum ExtractorFactoryError {
    #[error(transparent)]
    Ocr(#[from] OcrEngineFactoryError),
}

pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Builds the content-type dispatch table. Image types are only registered
    /// when an OCR engine is configured.
    pub fn create(settings: &OcrSettings) -> Result<CompositeFileLoader, ExtractorFactoryError> {
        let ocr_engine = OcrEngineFactory::create(settings)?;

        let mut pdf_adapter = PdfAdapter::new();
        let mut adapters: Vec<(ContentType, Arc<dyn FileLoader>)> = vec![
            (ContentType::Docx, Arc::new(DocxAdapter)),
            (ContentType::Text, Arc::new(PlainTextAdapter)),
        ];

        if let Some(engine) = ocr_engine {
            let rasterizer: Arc<dyn PageRasterizer> =
                Arc::new(PdfiumRasterizer::new(settings.render_dpi));
            pdf_adapter = pdf_adapter.with_ocr_fallback(rasterizer, Arc::clone(&engine));

            let image_adapter: Arc<dyn FileLoader> = Arc::new(ImageOcrAdapter::new(engine));
            for content_type in [ContentType::Png, ContentType::Jpeg, ContentType::Webp] {
                adapters.push((content_type, Arc::clone(&image_adapter)));
            }
        }

        adapters.push((ContentType::Pdf, Arc::new(pdf_adapter)));

        let loader = CompositeFileLoader::new(adapters);
        tracing::info!(supported = ?loader.supported_types(), "Extraction pipeline ready");
        Ok(loader)
    }
}
