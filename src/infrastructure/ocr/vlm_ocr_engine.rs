use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{OcrEngine, OcrError, OcrWorker};

pub const VLM_TIMEOUT: Duration = Duration::from_secs(300);
pub const OCR_PROMPT: &str = "You are an OCR engine. Transcribe all of the text visible in this image \
exactly as written, preserving reading order and line breaks.\n\
\n\
Rules:\n\
1. Output ONLY the transcribed text. No commentary, no Markdown fences.\n\
2. Do not summarise, translate or correct the text.\n\
3. If the image contains no readable text, output nothing.";

/// OCR through an OpenAI-compatible vision chat endpoint such as LM Studio.
pub struct VlmOcrEngine {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl VlmOcrEngine {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, OcrError> {
        let client = Client::builder()
            .timeout(VLM_TIMEOUT)
            .build()
            .map_err(|e| OcrError::StartupFailed(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl OcrEngine for VlmOcrEngine {
    async fn acquire(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        Ok(Box::new(VlmWorker {
            client: self.client.clone(),
            url: format!("{}/v1/chat/completions", self.base_url),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }))
    }
}

struct VlmWorker {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl OcrWorker for VlmWorker {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, OcrError> {
        let b64 = general_purpose::STANDARD.encode(image);
        let data_uri = format!("data:{};base64,{b64}", image_mime(image));

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": { "url": data_uri }
                        },
                        {
                            "type": "text",
                            "text": OCR_PROMPT
                        }
                    ]
                }
            ],
            "max_tokens": 2048,
            "temperature": 0.0,
            "stream": false
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OcrError::Timeout
                } else {
                    OcrError::RecognitionFailed(format!("vision request: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OcrError::RecognitionFailed(format!(
                "vision endpoint returned {status}: {text}"
            )));
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| OcrError::RecognitionFailed(format!("vision read: {e}")))?;

        let completion: ChatCompletion = serde_json::from_slice(&raw_bytes).map_err(|e| {
            tracing::error!(
                raw_response = %String::from_utf8_lossy(&raw_bytes),
                "Failed to parse vision completion JSON"
            );
            OcrError::RecognitionFailed(format!("vision JSON: {e}"))
        })?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    fn release(self: Box<Self>) {}
}

fn image_mime(image: &[u8]) -> &'static str {
    if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if image.len() >= 12 && &image[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}
