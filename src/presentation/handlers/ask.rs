use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient};
use crate::application::services::{CoachingError, CoachingRequest};
use crate::presentation::state::AppState;

use super::error_response::error_response;
use super::upload_form::UploadForm;

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub extraction_warning: Option<String>,
    pub context_truncated: bool,
}

/// Question submission: optional upload is extracted first, then the coach answers.
#[tracing::instrument(skip(state, multipart))]
pub async fn ask_handler<F, L>(
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

    let request = CoachingRequest {
        question: form.field("question").unwrap_or_default().to_string(),
        tone: form.field("tone").map(str::to_string),
        recipient: form.field("recipient").map(str::to_string),
    };

    let extraction = match &form.file {
        Some(file) => Some(
            state
                .extraction_service
                .extract(&file.data, &file.content_type, &file.filename)
                .await,
        ),
        None => None,
    };

    match state
        .coaching_service
        .answer(&request, extraction.as_ref())
        .await
    {
        Ok(answer) => {
            tracing::info!(
                answer_chars = answer.answer.chars().count(),
                warned = answer.extraction_warning.is_some(),
                "Coaching answer ready"
            );
            (
                StatusCode::OK,
                Json(AskResponse {
                    answer: answer.answer,
                    extraction_warning: answer.extraction_warning,
                    context_truncated: answer.context_truncated,
                }),
            )
                .into_response()
        }
        Err(CoachingError::EmptyQuestion) => {
            error_response(StatusCode::BAD_REQUEST, "Question must not be empty")
        }
        Err(CoachingError::EmptyCompletion) => {
            tracing::error!("Coach returned an empty answer");
            error_response(StatusCode::BAD_GATEWAY, "The coach returned an empty answer")
        }
        Err(e) => {
            tracing::error!(error = %e, "Coaching completion failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Coaching request failed: {}", e),
            )
        }
    }
}
