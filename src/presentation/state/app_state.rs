use std::sync::Arc;

use crate::application::ports::{FileLoader, LlmClient};
use crate::application::services::{CoachingService, TextExtractionService};

pub struct AppState<F: ?Sized, L>
where
    F: FileLoader,
    L: LlmClient,
{
    pub extraction_service: Arc<TextExtractionService<F>>,
    pub coaching_service: Arc<CoachingService<L>>,
    pub max_upload_bytes: usize,
}

impl<F: ?Sized, L> Clone for AppState<F, L>
where
    F: FileLoader,
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            extraction_service: Arc::clone(&self.extraction_service),
            coaching_service: Arc::clone(&self.coaching_service),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
