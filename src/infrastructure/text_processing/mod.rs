mod blocking;
mod composite_file_loader;
mod docx_adapter;
mod extractor_factory;
mod image_ocr_adapter;
mod pdf_adapter;
mod pdf_rasterizer;
mod plain_text_adapter;
mod text_sanitizer;

pub use composite_file_loader::CompositeFileLoader;
pub use docx_adapter::{DocxAdapter, document_xml_to_text};
pub use extractor_factory::{ExtractorFactory, ExtractorFactoryError};
pub use image_ocr_adapter::ImageOcrAdapter;
pub use pdf_adapter::PdfAdapter;
pub use pdf_rasterizer::{DEFAULT_RENDER_DPI, PdfiumRasterizer};
pub use plain_text_adapter::PlainTextAdapter;
pub use text_sanitizer::{collapse_whitespace, sanitize_extracted_text};
