use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient};
use crate::domain::{ExtractionDiagnostic, ExtractionMethod};
use crate::presentation::state::AppState;

use super::error_response::error_response;
use super::upload_form::UploadForm;

#[derive(Serialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub content_type: String,
    pub text: String,
    pub method: ExtractionMethod,
    pub truncated: bool,
    pub fallback_attempted: bool,
    pub diagnostic: Option<ExtractionDiagnostic>,
}

/// Extraction never fails once a file arrives; problems come back as sentinel text.
#[tracing::instrument(skip(state, multipart))]
pub async fn extract_handler<F, L>(
    State(state): State<AppState<F, L>>,
    multipart: Multipart,
) -> impl IntoResponse
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + 'static,
{
    let form = match UploadForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return error_response(e.status(), format!("Failed to read multipart: {}", e));
        }
    };

    let Some(file) = form.file else {
        tracing::warn!("Extract request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    let result = state
        .extraction_service
        .extract(&file.data, &file.content_type, &file.filename)
        .await;

    (
        StatusCode::OK,
        Json(ExtractResponse {
            filename: file.filename,
            content_type: file.content_type,
            text: result.text,
            method: result.method,
            truncated: result.truncated,
            fallback_attempted: result.fallback_attempted,
            diagnostic: result.diagnostic,
        }),
    )
        .into_response()
}
