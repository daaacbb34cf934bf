use std::time::Duration;

pub const DEFAULT_MAX_PAGES: usize = 10;
pub const DEFAULT_MAX_CHARS: usize = 10_000;
pub const DEFAULT_OCR_MIN_CHARS: usize = 100;
pub const DEFAULT_MAX_FILE_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call bounds on the work an extraction may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_pages: usize,
    pub max_chars: usize,
    /// Below this many characters a PDF text layer is treated as absent and OCR is attempted.
    pub ocr_min_chars: usize,
    pub max_file_bytes: usize,
    pub parse_timeout: Duration,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_chars: DEFAULT_MAX_CHARS,
            ocr_min_chars: DEFAULT_OCR_MIN_CHARS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            parse_timeout: DEFAULT_PARSE_TIMEOUT,
        }
    }
}

impl ExtractionLimits {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_ocr_min_chars(mut self, ocr_min_chars: usize) -> Self {
        self.ocr_min_chars = ocr_min_chars;
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn with_parse_timeout(mut self, parse_timeout: Duration) -> Self {
        self.parse_timeout = parse_timeout;
        self
    }
}
