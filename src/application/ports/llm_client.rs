use async_trait::async_trait;

/// Chat completion for coaching answers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// `context` is extracted document text, empty when the question came without a usable upload.
    async fn complete(&self, prompt: &str, context: &str) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rejected credentials: HTTP {0}")]
    Unauthorized(u16),
    #[error("rate limited")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
