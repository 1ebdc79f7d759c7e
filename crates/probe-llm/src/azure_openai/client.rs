// Azure OpenAI-specific client implementation

use crate::azure_openai::schema::ChatCompletionV1;
use crate::credential::{CredentialProvider, StaticCredential};
use crate::error::{ProbeError, Result};
use crate::traits::{ChatClient, ChatOptions, ChatRequest};
use crate::types::{CompletionResult, Message};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// GA api-version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Service limit for `top_logprobs`
pub const MAX_TOP_LOGPROBS: u8 = 20;

/// Azure OpenAI client (HTTP direct, no SDK)
///
/// - URL: {endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...
/// - Auth: `api-key` header or `Authorization: Bearer`, resolved per request
/// - Deployment name is passed via the model field of each request
#[derive(Clone)]
pub struct AzureOpenAIClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_version: String,
    model_id: Option<String>,
    credential: Arc<dyn CredentialProvider>,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logprobs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_logprobs: Option<u8>,
}

impl<'a> ChatCompletionBody<'a> {
    fn new(messages: &'a [Message], options: &ChatOptions) -> Self {
        Self {
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            logprobs: options.logprobs,
            top_logprobs: options.top_logprobs,
        }
    }
}

impl AzureOpenAIClient {
    pub fn builder() -> AzureOpenAIClientBuilder {
        AzureOpenAIClientBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Build the full URL for an Azure OpenAI endpoint
    pub fn build_url(&self, deployment_name: &str, path: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint, deployment_name, path, self.api_version
        )
    }

    fn validate(request: &ChatRequest) -> Result<()> {
        if request.model.trim().is_empty() {
            return Err(ProbeError::InvalidInput("deployment name is empty".to_string()));
        }
        if request.messages.is_empty() {
            return Err(ProbeError::InvalidInput("conversation has no messages".to_string()));
        }
        if let Some(top) = request.options.top_logprobs {
            if top > MAX_TOP_LOGPROBS {
                return Err(ProbeError::InvalidInput(format!(
                    "top_logprobs must be at most {}, got {}",
                    MAX_TOP_LOGPROBS, top
                )));
            }
            if request.options.logprobs != Some(true) {
                return Err(ProbeError::InvalidInput(
                    "top_logprobs requires logprobs to be enabled".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for AzureOpenAIClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAIClient")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("model_id", &self.model_id)
            .field("credential", &self.credential.name())
            .finish()
    }
}

/// Builder for AzureOpenAIClient
#[derive(Default)]
pub struct AzureOpenAIClientBuilder {
    endpoint: Option<String>,
    api_version: Option<String>,
    model_id: Option<String>,
    credential: Option<Arc<dyn CredentialProvider>>,
}

impl AzureOpenAIClientBuilder {
    /// Set the Azure OpenAI endpoint (base URL)
    /// Example: "https://my-resource.openai.azure.com"
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Model identifier behind the deployment (informational only)
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn credential(mut self, credential: Arc<dyn CredentialProvider>) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Shorthand for a fixed `api-key` credential
    pub fn api_key(self, api_key: impl Into<String>) -> Self {
        self.credential(Arc::new(StaticCredential::api_key(api_key)))
    }

    pub fn build(self) -> Result<AzureOpenAIClient> {
        let endpoint = self
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ProbeError::ConfigurationMissing("endpoint".to_string()))?;
        let api_version = self
            .api_version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ProbeError::ConfigurationMissing("API version".to_string()))?;
        let credential = self
            .credential
            .ok_or_else(|| ProbeError::ConfigurationMissing("credential".to_string()))?;

        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ProbeError::InvalidConfiguration(format!(
                "endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }

        // Remove trailing slash from endpoint
        let endpoint = endpoint.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(AzureOpenAIClient {
            http_client,
            endpoint,
            api_version,
            model_id: self.model_id,
            credential,
        })
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatClient for AzureOpenAIClient {
    async fn complete(&self, request: ChatRequest) -> Result<CompletionResult> {
        Self::validate(&request)?;

        let url = self.build_url(&request.model, "chat/completions");
        let body = ChatCompletionBody::new(&request.messages, &request.options);
        let (auth_name, auth_value) = self.credential.credential().await?.header()?;

        tracing::debug!(
            url = %url,
            model_id = self.model_id.as_deref().unwrap_or("-"),
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .header(auth_name, auth_value)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProbeError::AuthenticationFailure(format!(
                "Azure OpenAI rejected the credential ({}): {}",
                status, error_text
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProbeError::Service {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let bytes = response.bytes().await?;
        let result = CompletionResult::try_from(ChatCompletionV1::from_slice(&bytes)?)?;

        tracing::info!(
            id = %result.id,
            model = %result.model,
            finish_reason = %result.finish_reason,
            total_tokens = result.usage.total_tokens,
            "Received chat completion"
        );

        Ok(result)
    }
}
