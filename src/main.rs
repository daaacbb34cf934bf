use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use custody_coach::application::services::{CoachingService, TextExtractionService};
use custody_coach::infrastructure::llm::OpenAiClient;
use custody_coach::infrastructure::observability::{TracingConfig, init_tracing};
use custody_coach::infrastructure::text_processing::ExtractorFactory;
use custody_coach::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment))?;

    let file_loader = Arc::new(
        ExtractorFactory::create(&settings.ocr).context("Failed to build extraction pipeline")?,
    );
    let limits = settings.extraction.limits();
    tracing::info!(
        max_pages = limits.max_pages,
        max_chars = limits.max_chars,
        ocr_min_chars = limits.ocr_min_chars,
        "Extraction limits loaded"
    );
    let extraction_service = Arc::new(TextExtractionService::new(file_loader, limits));

    let llm_client =
        Arc::new(OpenAiClient::new(&settings.llm).context("Failed to build LLM client")?);
    let coaching_service = Arc::new(CoachingService::new(llm_client));

    let state = AppState {
        extraction_service,
        coaching_service,
        max_upload_bytes: settings.server.max_upload_mb * 1024 * 1024,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
