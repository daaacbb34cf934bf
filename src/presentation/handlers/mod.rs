mod ask;
mod error_response;
mod extract;
mod health;
mod upload_form;

pub use ask::{AskResponse, ask_handler};
pub use error_response::ErrorResponse;
pub use extract::{ExtractResponse, extract_handler};
pub use health::health_handler;
pub use upload_form::{FILE_FIELD, UploadForm, UploadedFile};
