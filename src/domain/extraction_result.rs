use std::fmt;

use serde::Serialize;

use super::extracted_text::{ExtractedText, ExtractionMethod};

pub const TRUNCATION_MARKER: &str = "...[content truncated]";

/// Structural reasons an upload produced no text. Each renders a fixed sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionDiagnostic {
    EmptyInput,
    UnsupportedType,
    InvalidPdfHeader,
    EncryptedPdf,
    InvalidDocx,
    InvalidImage,
    FileTooLarge,
    PdfExtractionFailed,
    DocxExtractionFailed,
    ExtractionFailed,
}

impl ExtractionDiagnostic {
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::EmptyInput => "[Empty file: no content to extract]",
            Self::UnsupportedType => "[Unsupported file type]",
            Self::InvalidPdfHeader => "[Invalid PDF: missing %PDF header]",
            Self::EncryptedPdf => {
                "[Encrypted PDF: password-protected documents are not supported]"
            }
            Self::InvalidDocx => "[Invalid DOCX: not a ZIP package]",
            Self::InvalidImage => "[Invalid image: content does not match its declared type]",
            Self::FileTooLarge => "[File too large to extract]",
            Self::PdfExtractionFailed => "[Failed to extract PDF text]",
            Self::DocxExtractionFailed => "[Failed to extract DOCX text]",
            Self::ExtractionFailed => "[Failed to extract text]",
        }
    }
}

impl fmt::Display for ExtractionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentinel())
    }
}

/// What the extraction boundary hands to prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub text: String,
    pub method: ExtractionMethod,
    pub truncated: bool,
    pub fallback_attempted: bool,
    pub diagnostic: Option<ExtractionDiagnostic>,
}

impl ExtractionResult {
    pub fn from_extracted(extracted: ExtractedText, max_chars: usize) -> Self {
        let (text, truncated) = truncate_text(extracted.text.trim(), max_chars);
        Self {
            text,
            method: extracted.method,
            truncated,
            fallback_attempted: extracted.fallback_attempted,
            diagnostic: None,
        }
    }

    /// The sentinel is capped like any other text.
    pub fn diagnostic(diagnostic: ExtractionDiagnostic, max_chars: usize) -> Self {
        let (text, truncated) = truncate_text(diagnostic.sentinel(), max_chars);
        Self {
            text,
            method: ExtractionMethod::Diagnostic,
            truncated,
            fallback_attempted: false,
            diagnostic: Some(diagnostic),
        }
    }

    /// True when the text carries nothing a prompt can use.
    pub fn is_unusable(&self) -> bool {
        self.diagnostic.is_some() || self.text.trim().is_empty()
    }
}

/// Caps `text` at `max_chars` characters, marker included.
pub fn truncate_text(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_len {
        return (text.chars().take(max_chars).collect(), true);
    }

    let keep = max_chars - marker_len;
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    (truncated, true)
}
