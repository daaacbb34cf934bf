use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::ExtractionResult;
use crate::infrastructure::observability::sanitize_prompt;

pub const DEFAULT_TONE: &str = "calm and neutral";
pub const DEFAULT_RECIPIENT: &str = "the other parent";
pub const NO_TEXT_WARNING: &str =
    "No text was found in your upload; the answer was written without it.";

#[derive(Debug, Clone, Default)]
pub struct CoachingRequest {
    pub question: String,
    pub tone: Option<String>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoachingAnswer {
    pub answer: String,
    pub extraction_warning: Option<String>,
    pub context_truncated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CoachingError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("completion failed: {0}")]
    Completion(#[from] LlmClientError),
    #[error("completion was empty")]
    EmptyCompletion,
}

pub struct CoachingService<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
}

impl<L> CoachingService<L>
where
    L: LlmClient,
{
    pub fn new(llm_client: Arc<L>) -> Self {
        Self { llm_client }
    }

    /// `extraction` is whatever came back from the extraction boundary for the
    /// attached upload, if there was one.
    pub async fn answer(
        &self,
        request: &CoachingRequest,
        extraction: Option<&ExtractionResult>,
    ) -> Result<CoachingAnswer, CoachingError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(CoachingError::EmptyQuestion);
        }

        let prompt = build_prompt(request);
        let context = extraction
            .filter(|e| !e.is_unusable())
            .map(|e| e.text.as_str())
            .unwrap_or_default();

        let extraction_warning = extraction.filter(|e| e.is_unusable()).map(|e| match e.diagnostic {
            Some(diagnostic) => format!("{NO_TEXT_WARNING} {}", diagnostic.sentinel()),
            None => NO_TEXT_WARNING.to_string(),
        });

        tracing::debug!(
            prompt = %sanitize_prompt(&prompt),
            context_chars = context.chars().count(),
            "Requesting coaching completion"
        );

        let answer = self.llm_client.complete(&prompt, context).await?;
        if answer.trim().is_empty() {
            tracing::warn!("LLM returned an empty completion");
            return Err(CoachingError::EmptyCompletion);
        }

        Ok(CoachingAnswer {
            answer: answer.trim().to_string(),
            extraction_warning,
            context_truncated: extraction.is_some_and(|e| e.truncated),
        })
    }
}

pub fn build_prompt(request: &CoachingRequest) -> String {
    let tone = non_blank(request.tone.as_deref()).unwrap_or(DEFAULT_TONE);
    let recipient = non_blank(request.recipient.as_deref()).unwrap_or(DEFAULT_RECIPIENT);

    format!(
        "Tone: {tone}\nRecipient: {recipient}\n\nQuestion:\n{}",
        request.question.trim()
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
