mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    DEFAULT_SYSTEM_PROMPT, ExtractionSettings, LlmSettings, LoggingSettings, OcrProvider,
    OcrSettings, ServerSettings, Settings,
};
