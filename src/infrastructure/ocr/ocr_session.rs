use crate::application::ports::{OcrEngine, OcrError};

/// Runs OCR over `images` in order on a single worker.
///
/// An image that fails to recognize contributes nothing. The worker is
/// released before returning, whatever happened to the individual images.
pub async fn recognize_images(
    engine: &dyn OcrEngine,
    images: &[Vec<u8>],
) -> Result<Vec<String>, OcrError> {
    let mut worker = engine.acquire().await?;
    let mut texts = Vec::with_capacity(images.len());

    for (index, image) in images.iter().enumerate() {
        match worker.recognize(image).await {
            Ok(text) => texts.push(text),
            Err(e) => {
                tracing::warn!(image_index = index, error = %e, "OCR failed for image, skipping");
            }
        }
    }

    worker.release();
    Ok(texts)
}
