use std::fmt;

use serde::Serialize;

/// Text of one PDF page. `page_number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

impl PageText {
    pub fn join(pages: &[PageText]) -> String {
        pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    TextLayer,
    OcrFallback,
    ImageOcr,
    DocumentXml,
    PlainText,
    Diagnostic,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextLayer => "text_layer",
            Self::OcrFallback => "ocr_fallback",
            Self::ImageOcr => "image_ocr",
            Self::DocumentXml => "document_xml",
            Self::PlainText => "plain_text",
            Self::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untruncated adapter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub fallback_attempted: bool,
    pub page_count: Option<usize>,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            text: text.into(),
            method,
            fallback_attempted: false,
            page_count: None,
        }
    }

    pub fn with_fallback_attempted(mut self, attempted: bool) -> Self {
        self.fallback_attempted = attempted;
        self
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }
}
