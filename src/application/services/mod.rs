mod coaching_service;
mod extraction_service;

pub use coaching_service::{
    CoachingAnswer, CoachingError, CoachingRequest, CoachingService, DEFAULT_RECIPIENT,
    DEFAULT_TONE, NO_TEXT_WARNING, build_prompt,
};
pub use extraction_service::TextExtractionService;
