use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, ExtractedText, ExtractionLimits, ExtractionMethod, UploadedDocument};

use super::blocking::run_blocking;
use super::text_sanitizer::sanitize_extracted_text;

const DOCUMENT_PART: &str = "word/document.xml";
const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

/// Reads the body text runs of an OOXML word-processing package.
pub struct DocxAdapter;

impl DocxAdapter {
    fn read_document_xml(data: &[u8]) -> Result<String, FileLoaderError> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| FileLoaderError::InvalidPackage(format!("unreadable ZIP: {e}")))?;

        let part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| FileLoaderError::InvalidPackage(format!("{DOCUMENT_PART}: {e}")))?;

        let mut xml = String::new();
        part.take(MAX_DOCUMENT_XML_BYTES)
            .read_to_string(&mut xml)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("read {DOCUMENT_PART}: {e}")))?;

        Ok(xml)
    }
}

/// Flattens `word/document.xml` into text: run text in document order,
/// `w:tab` as a tab, `w:br`/`w:cr` and paragraph ends as newlines.
pub fn document_xml_to_text(xml: &str) -> Result<String, FileLoaderError> {
    let malformed = |e: quick_xml::Error| {
        FileLoaderError::ExtractionFailed(format!("malformed {DOCUMENT_PART}: {e}"))
    };

    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_text = false;
    // Tab stop definitions under `w:pPr/w:tabs` are also spelled `w:tab`.
    let mut in_tab_stops = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:tabs" => in_tab_stops = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:tabs" => in_tab_stops = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if !in_tab_stops => out.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text => out.push_str(&text.unescape().map_err(malformed)?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(
        skip(self, data, limits),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &UploadedDocument,
        limits: &ExtractionLimits,
    ) -> Result<ExtractedText, FileLoaderError> {
        if document.content_type != ContentType::Docx {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        if data.is_empty() {
            return Err(FileLoaderError::EmptyInput);
        }

        if !ContentType::Docx.has_signature(data) {
            return Err(FileLoaderError::InvalidHeader(
                "missing ZIP local file header".to_string(),
            ));
        }

        let data_owned = data.to_vec();
        let text = run_blocking(limits.parse_timeout, "DOCX extraction", move || {
            let xml = Self::read_document_xml(&data_owned)?;
            Ok(sanitize_extracted_text(&document_xml_to_text(&xml)?))
        })
        .await?;

        tracing::info!(chars = text.chars().count(), "DOCX text extraction complete");

        Ok(ExtractedText::new(text, ExtractionMethod::DocumentXml))
    }
}
