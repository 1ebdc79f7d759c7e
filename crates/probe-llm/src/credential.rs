// Credential resolution for Azure OpenAI
// A provider yields either an api-key or a bearer token for the target endpoint

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Token scope used by Azure OpenAI (Cognitive Services)
pub const COGNITIVE_SERVICES_RESOURCE: &str = "https://cognitiveservices.azure.com";

pub const API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";
pub const AD_TOKEN_ENV: &str = "AZURE_OPENAI_AD_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_on: None,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Resolved credential for one request
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    Bearer(AccessToken),
}

impl Credential {
    /// Header carrying this credential
    pub fn header(&self) -> Result<(HeaderName, HeaderValue)> {
        let (name, value) = match self {
            Self::ApiKey(key) => (HeaderName::from_static("api-key"), key.clone()),
            Self::Bearer(token) => (AUTHORIZATION, format!("Bearer {}", token.token)),
        };

        let mut value = HeaderValue::from_str(&value).map_err(|_| {
            ProbeError::AuthenticationFailure("credential contains invalid header characters".to_string())
        })?;
        value.set_sensitive(true);

        Ok((name, value))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::Bearer(token) => f.debug_tuple("Bearer").field(token).finish(),
        }
    }
}

/// Capability that yields a credential for the Azure OpenAI endpoint
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Short name used in logs and chained error messages
    fn name(&self) -> &'static str;

    async fn credential(&self) -> Result<Credential>;
}

/// Always returns the same credential
#[derive(Debug, Clone)]
pub struct StaticCredential {
    credential: Credential,
}

impl StaticCredential {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            credential: Credential::ApiKey(key.into()),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            credential: Credential::Bearer(AccessToken::new(token)),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn credential(&self) -> Result<Credential> {
        Ok(self.credential.clone())
    }
}

/// Reads `AZURE_OPENAI_API_KEY`, then `AZURE_OPENAI_AD_TOKEN`
#[derive(Clone, Default)]
pub struct EnvironmentCredential {
    api_key: Option<String>,
    ad_token: Option<String>,
}

impl EnvironmentCredential {
    pub fn new(api_key: Option<String>, ad_token: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|v| !v.trim().is_empty()),
            ad_token: ad_token.filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok(), std::env::var(AD_TOKEN_ENV).ok())
    }
}

#[async_trait]
impl CredentialProvider for EnvironmentCredential {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn credential(&self) -> Result<Credential> {
        if let Some(key) = &self.api_key {
            return Ok(Credential::ApiKey(key.clone()));
        }
        if let Some(token) = &self.ad_token {
            return Ok(Credential::Bearer(AccessToken::new(token.clone())));
        }
        Err(ProbeError::AuthenticationFailure(format!(
            "neither {} nor {} is set",
            API_KEY_ENV, AD_TOKEN_ENV
        )))
    }
}

/// Fetches a bearer token from the signed-in Azure CLI
#[derive(Debug, Clone)]
pub struct AzureCliCredential {
    program: String,
    resource: String,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self {
            program: "az".to_string(),
            resource: COGNITIVE_SERVICES_RESOURCE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CliToken {
    #[serde(rename = "accessToken")]
    access_token: String,
    /// Unix seconds; only emitted by newer CLI versions
    #[serde(default)]
    expires_on: Option<i64>,
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    fn parse_output(stdout: &[u8]) -> Result<AccessToken> {
        let raw: CliToken = serde_json::from_slice(stdout).map_err(|e| {
            ProbeError::AuthenticationFailure(format!("unexpected az output: {}", e))
        })?;

        Ok(AccessToken {
            token: raw.access_token,
            expires_on: raw
                .expires_on
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

#[async_trait]
impl CredentialProvider for AzureCliCredential {
    fn name(&self) -> &'static str {
        "azure_cli"
    }

    async fn credential(&self) -> Result<Credential> {
        let output = tokio::process::Command::new(&self.program)
            .args([
                "account",
                "get-access-token",
                "--resource",
                &self.resource,
                "--output",
                "json",
            ])
            .output()
            .await
            .map_err(|e| {
                ProbeError::AuthenticationFailure(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::AuthenticationFailure(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(Credential::Bearer(Self::parse_output(&output.stdout)?))
    }
}

/// Tries each provider in order; the first credential wins
#[derive(Clone)]
pub struct DefaultCredential {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl DefaultCredential {
    /// Environment variables, then the Azure CLI
    pub fn new() -> Self {
        Self::from_providers(vec![
            Arc::new(EnvironmentCredential::from_env()),
            Arc::new(AzureCliCredential::new()),
        ])
    }

    pub fn from_providers(providers: Vec<Arc<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }
}

impl Default for DefaultCredential {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for DefaultCredential {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn credential(&self) -> Result<Credential> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            match provider.credential().await {
                Ok(credential) => {
                    tracing::debug!(provider = provider.name(), "Resolved credential");
                    return Ok(credential);
                }
                Err(e) => {
                    tracing::debug!(provider = provider.name(), error = %e, "Credential provider failed");
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(ProbeError::AuthenticationFailure(if failures.is_empty() {
            "no credential providers configured".to_string()
        } else {
            failures.join("; ")
        }))
    }
}
