use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, Environment, File};
use probe_llm::azure_openai::{DEFAULT_API_VERSION, MAX_TOP_LOGPROBS};
use probe_llm::{ProbeError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

pub const ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";
pub const DEPLOYMENT_NAME_ENV: &str = "MODEL_DEPLOYMENT_NAME";
pub const MODEL_ID_ENV: &str = "MODEL_ID";
pub const MODEL_VERSION_ENV: &str = "MODEL_VERSION";

pub const DEFAULT_TOP_LOGPROBS: u8 = 3;

/// Settings shared by both programs, validated once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoint: String,
    pub deployment_name: String,
    pub model_id: Option<String>,
    pub api_version: String,
    /// Alternatives requested per token by `chat-logprobs`
    pub top_logprobs: u8,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ProbeError::InvalidConfiguration(format!(
                "unknown log format '{}', expected 'pretty' or 'json'",
                other
            ))),
        }
    }
}

// Flat keys: environment variable names, lowercased
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    azure_openai_endpoint: Option<String>,
    model_deployment_name: Option<String>,
    model_id: Option<String>,
    model_version: Option<String>,
    top_logprobs: Option<u8>,
    log_level: Option<String>,
    log_format: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| ProbeError::ConfigurationMissing(name.to_string()))
}

impl AppConfig {
    /// Load configuration from `config/default.toml` and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml (optional)
    /// 2. Environment variables (AZURE_OPENAI_ENDPOINT, MODEL_*, TOP_LOGPROBS, LOG_*)
    pub fn load() -> Result<Self> {
        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::default());

        Self::from_builder(builder)
    }

    /// Load from explicit key/value pairs instead of the process environment
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        let builder = ConfigLoader::builder().add_source(Environment::default().source(Some(vars)));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let raw: RawConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ProbeError::InvalidConfiguration(e.to_string()))?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let endpoint = required(raw.azure_openai_endpoint, ENDPOINT_ENV)?;
        let deployment_name = required(raw.model_deployment_name, DEPLOYMENT_NAME_ENV)?;

        let top_logprobs = raw.top_logprobs.unwrap_or(DEFAULT_TOP_LOGPROBS);
        if top_logprobs > MAX_TOP_LOGPROBS {
            return Err(ProbeError::InvalidConfiguration(format!(
                "TOP_LOGPROBS must be at most {}, got {}",
                MAX_TOP_LOGPROBS, top_logprobs
            )));
        }

        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            level: non_blank(raw.log_level).unwrap_or(defaults.level),
            format: match non_blank(raw.log_format) {
                Some(format) => format.parse()?,
                None => defaults.format,
            },
        };

        Ok(Self {
            endpoint,
            deployment_name,
            model_id: non_blank(raw.model_id),
            api_version: non_blank(raw.model_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            top_logprobs,
            logging,
        })
    }
}
