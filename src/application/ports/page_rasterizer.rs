use super::FileLoaderError;

/// Renders PDF pages to PNG for OCR. Called from the blocking pool.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, data: &[u8], max_pages: usize) -> Result<Vec<Vec<u8>>, FileLoaderError>;
}
