use crate::config::AppConfig;
use probe_llm::{
    AzureOpenAIClient, ChatClient, ChatHistory, ChatOptions, ChatRequest, CompletionResult,
    CredentialProvider, Result,
};
use probe_report::ResultFormatter;
use std::io::Write;
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are a comedian, expert about being funny";
pub const USER_PROMPT: &str = "Tell me a joke.";

/// Which diagnostics the request asks the service for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Service defaults; log-probability blocks stay empty
    Plain,
    /// `logprobs` with `top_logprobs` alternatives per token
    LogProbabilities,
}

/// The fixed two-message conversation both programs send
pub fn conversation() -> ChatHistory {
    let mut history = ChatHistory::new(SYSTEM_PROMPT);
    history.add_user_message(USER_PROMPT);
    history
}

pub fn build_request(config: &AppConfig, mode: RequestMode) -> ChatRequest {
    let options = match mode {
        RequestMode::Plain => ChatOptions::new(),
        RequestMode::LogProbabilities => ChatOptions::new().log_probabilities(config.top_logprobs),
    };

    ChatRequest::new(config.deployment_name.clone(), conversation()).with_options(options)
}

pub fn build_client(
    config: &AppConfig,
    credential: Arc<dyn CredentialProvider>,
) -> Result<AzureOpenAIClient> {
    let mut builder = AzureOpenAIClient::builder()
        .endpoint(config.endpoint.clone())
        .api_version(config.api_version.clone())
        .credential(credential);

    if let Some(model_id) = &config.model_id {
        builder = builder.model_id(model_id.clone());
    }

    builder.build()
}

/// Send one request and write the report for its result to `out`
pub async fn run<W: Write + ?Sized>(
    client: &dyn ChatClient,
    request: ChatRequest,
    out: &mut W,
) -> Result<CompletionResult> {
    let result = client.complete(request).await?;
    ResultFormatter::new().write(Some(&result), out)?;
    Ok(result)
}
