use std::sync::Arc;

use custody_coach::application::ports::{FileLoader, OcrEngine, PageRasterizer};
use custody_coach::application::services::TextExtractionService;
use custody_coach::domain::{
    ContentType, DOCX_MIME, ExtractionDiagnostic, ExtractionLimits, ExtractionMethod,
    TRUNCATION_MARKER,
};
use custody_coach::infrastructure::text_processing::{
    CompositeFileLoader, DocxAdapter, ImageOcrAdapter, PdfAdapter, PlainTextAdapter,
};

use crate::helpers::fixtures::{
    KNOWN_PHRASE, dense_pdf_text, docx_with_paragraphs, fake_png, pdf_with_pages, pdf_with_text,
    pdf_with_unreadable_first_page, pdf_without_text_layer, rc4_encrypted_pdf, zip_with_entries,
};
use crate::helpers::mocks::{FailingRasterizer, MockOcrEngine, MockRasterizer, OcrBehavior};

const SUPPORTED_MIMES: [&str; 6] = [
    "application/pdf",
    DOCX_MIME,
    "text/plain",
    "image/png",
    "image/jpeg",
    "image/webp",
];

fn service_without_ocr() -> TextExtractionService<CompositeFileLoader> {
    let pdf: Arc<dyn FileLoader> = Arc::new(PdfAdapter::new());
    let docx: Arc<dyn FileLoader> = Arc::new(DocxAdapter);
    let text: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let loader = CompositeFileLoader::new(vec![
        (ContentType::Pdf, pdf),
        (ContentType::Docx, docx),
        (ContentType::Text, text),
    ]);
    TextExtractionService::new(Arc::new(loader), ExtractionLimits::default())
}

fn service_with_ocr(
    engine: Arc<MockOcrEngine>,
    rasterizer: Arc<dyn PageRasterizer>,
) -> TextExtractionService<CompositeFileLoader> {
    let engine: Arc<dyn OcrEngine> = engine;
    let pdf: Arc<dyn FileLoader> =
        Arc::new(PdfAdapter::new().with_ocr_fallback(rasterizer, Arc::clone(&engine)));
    let docx: Arc<dyn FileLoader> = Arc::new(DocxAdapter);
    let text: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let image: Arc<dyn FileLoader> = Arc::new(ImageOcrAdapter::new(engine));
    let loader = CompositeFileLoader::new(vec![
        (ContentType::Pdf, pdf),
        (ContentType::Docx, docx),
        (ContentType::Text, text),
        (ContentType::Png, Arc::clone(&image)),
        (ContentType::Jpeg, Arc::clone(&image)),
        (ContentType::Webp, image),
    ]);
    TextExtractionService::new(Arc::new(loader), ExtractionLimits::default())
}

#[tokio::test]
async fn given_pdf_with_known_phrase_when_extracting_then_text_contains_phrase() {
    let service = service_without_ocr();

    let result = service
        .extract(&pdf_with_text(KNOWN_PHRASE), "application/pdf", "order.pdf")
        .await;

    assert!(result.text.contains(KNOWN_PHRASE), "got: {}", result.text);
    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert!(result.diagnostic.is_none());
}

#[tokio::test]
async fn given_zero_bytes_for_every_mime_when_extracting_then_returns_empty_sentinel() {
    let service = service_without_ocr();

    for mime in SUPPORTED_MIMES {
        let result = service.extract(&[], mime, "empty").await;

        assert_eq!(
            result.diagnostic,
            Some(ExtractionDiagnostic::EmptyInput),
            "mime: {mime}"
        );
        assert_eq!(result.text, ExtractionDiagnostic::EmptyInput.sentinel());
    }
}

#[tokio::test]
async fn given_pdf_mime_without_pdf_header_when_extracting_then_returns_invalid_header_sentinel() {
    let service = service_without_ocr();

    let result = service
        .extract(b"<html>definitely not a pdf</html>", "application/pdf", "x.pdf")
        .await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::InvalidPdfHeader));
    assert_eq!(result.text, "[Invalid PDF: missing %PDF header]");
}

#[tokio::test]
async fn given_truncated_pdf_body_when_extracting_then_returns_pdf_failure_sentinel() {
    let service = service_without_ocr();

    let result = service
        .extract(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog", "application/pdf", "cut.pdf")
        .await;

    assert_eq!(
        result.diagnostic,
        Some(ExtractionDiagnostic::PdfExtractionFailed)
    );
}

#[tokio::test]
async fn given_pdf_needing_user_password_when_extracting_then_returns_encrypted_sentinel() {
    let service = service_without_ocr();
    let data = rc4_encrypted_pdf(KNOWN_PHRASE, "hunter2");

    let result = service.extract(&data, "application/pdf", "locked.pdf").await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::EncryptedPdf));
    assert_eq!(result.text, ExtractionDiagnostic::EncryptedPdf.sentinel());
}

#[tokio::test]
async fn given_owner_password_only_pdf_when_extracting_then_text_layer_is_read() {
    let service = service_without_ocr();
    let data = rc4_encrypted_pdf("Parenting plan: Dad has alternating weekends", "");

    let result = service.extract(&data, "application/pdf", "filing.pdf").await;

    assert_eq!(result.diagnostic, None);
    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert!(result.text.contains("alternating weekends"));
}

#[tokio::test]
async fn given_unencrypted_pdf_mentioning_encrypt_when_extracting_then_text_is_returned() {
    let service = service_without_ocr();
    let data = pdf_with_text("The clerk never set the /Encrypt entry on this order");

    let result = service.extract(&data, "application/pdf", "order.pdf").await;

    assert_eq!(result.diagnostic, None);
    assert!(result.text.contains("/Encrypt entry"));
}

#[tokio::test]
async fn given_pdf_with_one_unreadable_page_when_extracting_then_other_pages_are_kept() {
    let service = service_without_ocr();
    let data = pdf_with_unreadable_first_page("Page two holds the schedule");

    let result = service.extract(&data, "application/pdf", "partial.pdf").await;

    assert_eq!(result.diagnostic, None);
    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert_eq!(result.text, "Page two holds the schedule");
}

#[tokio::test]
async fn given_cap_shorter_than_sentinel_when_extracting_then_sentinel_respects_cap() {
    let service = service_without_ocr();
    let limits = ExtractionLimits::default().with_max_chars(10);

    let result = service
        .extract_with_limits(b"PK\x03\x04", "application/zip", "bundle.zip", &limits)
        .await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::UnsupportedType));
    assert_eq!(result.text, "[Unsupport");
    assert!(result.text.chars().count() <= 10);
}

#[tokio::test]
async fn given_plain_text_over_cap_when_extracting_then_result_is_shorter_and_marked() {
    let service = service_without_ocr();
    let input = "Pickup is at six. ".repeat(1_000);
    let input = &input[..15_000];

    let result = service.extract(input.as_bytes(), "text/plain", "notes.txt").await;

    assert!(result.truncated);
    assert!(result.text.chars().count() < input.chars().count());
    assert!(result.text.chars().count() <= 10_000);
    assert!(result.text.ends_with(TRUNCATION_MARKER));
}

#[tokio::test]
async fn given_same_input_twice_when_extracting_then_results_are_identical() {
    let service = service_without_ocr();
    let data = pdf_with_text(&dense_pdf_text());

    let first = service.extract(&data, "application/pdf", "plan.pdf").await;
    let second = service.extract(&data, "application/pdf", "plan.pdf").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn given_zip_mime_when_extracting_then_returns_unsupported_sentinel() {
    let service = service_without_ocr();

    let result = service
        .extract(b"PK\x03\x04whatever", "application/zip", "bundle.zip")
        .await;

    assert_eq!(result.text, "[Unsupported file type]");
    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::UnsupportedType));
}

#[tokio::test]
async fn given_upload_over_size_limit_when_extracting_then_returns_too_large_sentinel() {
    let service = service_without_ocr();
    let limits = ExtractionLimits::default().with_max_file_bytes(16);

    let result = service
        .extract_with_limits(&[b'a'; 64], "text/plain", "big.txt", &limits)
        .await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::FileTooLarge));
}

#[tokio::test]
async fn given_docx_with_known_phrase_when_extracting_then_text_contains_phrase() {
    let service = service_without_ocr();
    let data = docx_with_paragraphs(&[KNOWN_PHRASE, "Exchanges happen at school."]);

    let result = service.extract(&data, DOCX_MIME, "plan.docx").await;

    assert_eq!(result.method, ExtractionMethod::DocumentXml);
    assert_eq!(
        result.text,
        format!("{KNOWN_PHRASE}\nExchanges happen at school.")
    );
}

#[tokio::test]
async fn given_docx_mime_with_non_zip_bytes_when_extracting_then_returns_invalid_docx_sentinel() {
    let service = service_without_ocr();

    let result = service.extract(b"plain words", DOCX_MIME, "fake.docx").await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::InvalidDocx));
}

#[tokio::test]
async fn given_zip_without_document_part_when_extracting_docx_then_returns_invalid_docx_sentinel() {
    let service = service_without_ocr();
    let data = zip_with_entries(&[("readme.txt", "not a word document")]);

    let result = service.extract(&data, DOCX_MIME, "odd.docx").await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::InvalidDocx));
}

#[tokio::test]
async fn given_image_when_ocr_disabled_then_returns_unsupported_sentinel() {
    let service = service_without_ocr();

    let result = service.extract(&fake_png(), "image/png", "scan.png").await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::UnsupportedType));
}

#[tokio::test]
async fn given_png_with_known_phrase_when_extracting_then_returns_ocr_text() {
    let engine = Arc::new(MockOcrEngine::returning(KNOWN_PHRASE));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(1)));

    let result = service.extract(&fake_png(), "image/png", "scan.png").await;

    assert_eq!(result.text, KNOWN_PHRASE);
    assert_eq!(result.method, ExtractionMethod::ImageOcr);
    assert_eq!(engine.counters.acquired(), 1);
    assert_eq!(engine.counters.released(), 1);
}

#[tokio::test]
async fn given_image_bytes_not_matching_mime_when_extracting_then_returns_invalid_image_sentinel() {
    let engine = Arc::new(MockOcrEngine::returning("unused"));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(1)));

    let result = service.extract(&fake_png(), "image/jpeg", "scan.jpg").await;

    assert_eq!(result.diagnostic, Some(ExtractionDiagnostic::InvalidImage));
    assert_eq!(engine.counters.acquired(), 0);
}

#[tokio::test]
async fn given_image_ocr_failure_when_extracting_then_returns_empty_text_not_sentinel() {
    let engine = Arc::new(MockOcrEngine::with_behavior(OcrBehavior::FailEveryImage));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(1)));

    let result = service.extract(&fake_png(), "image/png", "blurry.png").await;

    assert_eq!(result.text, "");
    assert!(result.diagnostic.is_none());
    assert!(result.is_unusable());
    assert_eq!(engine.counters.released(), 1);
}

#[tokio::test]
async fn given_sparse_text_layer_when_extracting_then_falls_back_to_ocr() {
    let engine = Arc::new(MockOcrEngine::returning("Scanned order: weekends alternate."));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(1)));

    let result = service
        .extract(&pdf_with_text(KNOWN_PHRASE), "application/pdf", "scan.pdf")
        .await;

    assert_eq!(result.method, ExtractionMethod::OcrFallback);
    assert!(result.fallback_attempted);
    assert_eq!(result.text, "Scanned order: weekends alternate.");
    assert_eq!(engine.counters.acquired(), 1);
    assert_eq!(engine.counters.released(), 1);
}

#[tokio::test]
async fn given_dense_text_layer_when_extracting_then_ocr_is_not_invoked() {
    let engine = Arc::new(MockOcrEngine::returning("should not be used"));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(1)));

    let result = service
        .extract(&pdf_with_text(&dense_pdf_text()), "application/pdf", "plan.pdf")
        .await;

    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert!(!result.fallback_attempted);
    assert!(result.text.contains(KNOWN_PHRASE));
    assert_eq!(engine.counters.acquired(), 0);
}

#[tokio::test]
async fn given_sparse_text_layer_and_ocr_yields_nothing_when_extracting_then_keeps_sparse_text() {
    let engine = Arc::new(MockOcrEngine::with_behavior(OcrBehavior::FailEveryImage));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(2)));

    let result = service
        .extract(&pdf_with_text(KNOWN_PHRASE), "application/pdf", "scan.pdf")
        .await;

    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert!(result.fallback_attempted);
    assert!(result.text.contains(KNOWN_PHRASE));
    assert_eq!(engine.counters.recognized(), 2);
    assert_eq!(engine.counters.released(), 1);
}

#[tokio::test]
async fn given_no_text_layer_and_rasterizer_failure_when_extracting_then_returns_empty_text() {
    let engine = Arc::new(MockOcrEngine::returning("never reached"));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(FailingRasterizer));

    let result = service
        .extract(&pdf_without_text_layer(), "application/pdf", "scan.pdf")
        .await;

    assert_eq!(result.text, "");
    assert!(result.fallback_attempted);
    assert!(result.diagnostic.is_none());
    assert_eq!(engine.counters.acquired(), 0);
}

#[tokio::test]
async fn given_unavailable_ocr_engine_when_extracting_scan_then_returns_empty_text() {
    let engine = Arc::new(MockOcrEngine::with_behavior(OcrBehavior::Unavailable));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(1)));

    let result = service
        .extract(&pdf_without_text_layer(), "application/pdf", "scan.pdf")
        .await;

    assert_eq!(result.text, "");
    assert_eq!(result.method, ExtractionMethod::OcrFallback);
    assert!(result.fallback_attempted);
}

#[tokio::test]
async fn given_more_pages_than_limit_when_extracting_then_only_first_pages_are_read() {
    let service = service_without_ocr();
    let data = pdf_with_pages(&["Alpha page", "Bravo page", "Charlie page"]);
    let limits = ExtractionLimits::default().with_max_pages(2);

    let result = service
        .extract_with_limits(&data, "application/pdf", "long.pdf", &limits)
        .await;

    assert!(result.text.contains("Alpha page"));
    assert!(result.text.contains("Bravo page"));
    assert!(!result.text.contains("Charlie page"));
}

#[tokio::test]
async fn given_max_pages_limit_when_falling_back_then_rasterizes_at_most_that_many() {
    let engine = Arc::new(MockOcrEngine::returning("page"));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(25)));
    let limits = ExtractionLimits::default().with_max_pages(3);

    let result = service
        .extract_with_limits(&pdf_without_text_layer(), "application/pdf", "scan.pdf", &limits)
        .await;

    assert_eq!(engine.counters.recognized(), 3);
    assert_eq!(result.text, "page\npage\npage");
}

#[tokio::test]
async fn given_text_upload_when_using_string_entry_point_then_returns_plain_string() {
    let service = service_without_ocr();

    let text = service.extract_text(b"\xEF\xBB\xBFHello there", "text/plain").await;

    assert_eq!(text, "Hello there");
}

#[tokio::test]
async fn given_invalid_utf8_text_when_extracting_then_decodes_lossily() {
    let service = service_without_ocr();

    let result = service
        .extract(b"caf\xE9 schedule", "text/plain", "latin1.txt")
        .await;

    assert_eq!(result.text, "caf\u{FFFD} schedule");
}

#[tokio::test]
async fn given_one_page_failing_ocr_when_falling_back_then_remaining_pages_are_kept() {
    let engine = Arc::new(MockOcrEngine::with_behavior(OcrBehavior::FailImageAt(
        0,
        "Scanned page".to_string(),
    )));
    let service = service_with_ocr(Arc::clone(&engine), Arc::new(MockRasterizer::with_pages(3)));

    let result = service
        .extract(&pdf_without_text_layer(), "application/pdf", "scan.pdf")
        .await;

    assert_eq!(result.method, ExtractionMethod::OcrFallback);
    assert_eq!(result.text, "Scanned page 2\nScanned page 3");
    assert_eq!(engine.counters.released(), 1);
}
