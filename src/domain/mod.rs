mod document;
mod document_id;
mod extracted_text;
mod extraction_limits;
mod extraction_result;

pub use document::{ContentType, DOCX_MIME, UploadedDocument};
pub use document_id::DocumentId;
pub use extracted_text::{ExtractedText, ExtractionMethod, PageText};
pub use extraction_limits::{
    DEFAULT_MAX_CHARS, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_PAGES, DEFAULT_OCR_MIN_CHARS,
    DEFAULT_PARSE_TIMEOUT, ExtractionLimits,
};
pub use extraction_result::{
    ExtractionDiagnostic, ExtractionResult, TRUNCATION_MARKER, truncate_text,
};
