use anyhow::{Context, Result};
use probe_cli::{build_client, build_request, run, AppConfig, RequestMode};
use probe_llm::DefaultCredential;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    probe_cli::logging::init_logging(&config.logging);

    tracing::info!(
        endpoint = %config.endpoint,
        deployment = %config.deployment_name,
        api_version = %config.api_version,
        "Requesting chat completion with token log probabilities"
    );

    let client = build_client(&config, Arc::new(DefaultCredential::new()))
        .context("Failed to create Azure OpenAI client")?;
    let request = build_request(&config, RequestMode::LogProbabilities);

    let stdout = std::io::stdout();
    run(&client, request, &mut stdout.lock())
        .await
        .context("Chat completion failed")?;

    Ok(())
}
