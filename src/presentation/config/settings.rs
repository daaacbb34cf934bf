use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::ExtractionLimits;

use super::Environment;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a custody coach helping a parent communicate \
about parenting time, schedules and child-related decisions. Answer in the requested tone, \
address the named recipient, stay factual and child-focused, and never give legal advice. \
If the context below comes from an uploaded document, rely on it where relevant.\n\
\n\
Context:\n{context}";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub extraction: ExtractionSettings,
    pub ocr: OcrSettings,
    pub llm: LlmSettings,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP_`-prefixed
    /// environment variables, e.g. `APP_EXTRACTION__MAX_CHARS=50000`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_mb: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub max_pages: usize,
    pub max_chars: usize,
    pub ocr_min_chars: usize,
    pub max_file_size_mb: usize,
    pub parse_timeout_secs: u64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        let limits = ExtractionLimits::default();
        Self {
            max_pages: limits.max_pages,
            max_chars: limits.max_chars,
            ocr_min_chars: limits.ocr_min_chars,
            max_file_size_mb: limits.max_file_bytes / (1024 * 1024),
            parse_timeout_secs: limits.parse_timeout.as_secs(),
        }
    }
}

impl ExtractionSettings {
    pub fn limits(&self) -> ExtractionLimits {
        ExtractionLimits::default()
            .with_max_pages(self.max_pages)
            .with_max_chars(self.max_chars)
            .with_ocr_min_chars(self.ocr_min_chars)
            .with_max_file_bytes(self.max_file_size_mb * 1024 * 1024)
            .with_parse_timeout(Duration::from_secs(self.parse_timeout_secs))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    #[default]
    Tesseract,
    Vlm,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub provider: OcrProvider,
    pub tesseract_path: String,
    pub language: String,
    pub render_dpi: f32,
    pub timeout_secs: u64,
    pub vlm_base_url: Option<String>,
    pub vlm_model: Option<String>,
    pub vlm_api_key: Option<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            provider: OcrProvider::Tesseract,
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            render_dpi: 150.0,
            timeout_secs: 60,
            vlm_base_url: None,
            vlm_model: None,
            vlm_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// `{context}` is replaced with the extracted document text.
    pub system_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.4,
            timeout_secs: 60,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}
