use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{FileLoader, LlmClient};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub limits: LimitsResponse,
}

#[derive(Serialize)]
pub struct LimitsResponse {
    pub max_pages: usize,
    pub max_chars: usize,
    pub ocr_min_chars: usize,
    pub max_file_bytes: usize,
    pub max_upload_bytes: usize,
}

pub async fn health_handler<F, L>(State(state): State<AppState<F, L>>) -> impl IntoResponse
where
    F: FileLoader + ?Sized + 'static,
    L: LlmClient + 'static,
{
    let limits = state.extraction_service.limits();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            limits: LimitsResponse {
                max_pages: limits.max_pages,
                max_chars: limits.max_chars,
                ocr_min_chars: limits.ocr_min_chars,
                max_file_bytes: limits.max_file_bytes,
                max_upload_bytes: state.max_upload_bytes,
            },
        }),
    )
}
