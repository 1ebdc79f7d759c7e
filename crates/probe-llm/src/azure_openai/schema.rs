// Wire schema for chat/completions responses (object kind "chat.completion")
// Any mismatch is reported as MalformedResult instead of being coerced

use crate::error::{ProbeError, Result};
use crate::types::{
    ChatRole, CompletionResult, Content, FinishReason, TokenLogProbability, TokenUsage,
    TopLogProbability,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub const CHAT_COMPLETION_OBJECT: &str = "chat.completion";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionV1 {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    #[serde(default)]
    pub system_fingerprint: Option<String>,
    pub choices: Vec<ChoiceV1>,
    #[serde(default)]
    pub usage: Option<UsageV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceV1 {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessageV1,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub logprobs: Option<LogProbsV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessageV1 {
    pub role: ChatRole,
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogProbsV1 {
    #[serde(default)]
    pub content: Option<Vec<TokenLogProbV1>>,
    #[serde(default)]
    pub refusal: Option<Vec<TokenLogProbV1>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLogProbV1 {
    pub token: String,
    pub logprob: f64,
    #[serde(default)]
    pub top_logprobs: Vec<TopLogProbV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopLogProbV1 {
    pub token: String,
    pub logprob: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageV1 {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletionV1 {
    /// Decode a response body, keeping the decoder's diagnostic on failure
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            ProbeError::MalformedResult(format!("response does not match {}: {}", CHAT_COMPLETION_OBJECT, e))
        })
    }
}

impl From<TokenLogProbV1> for TokenLogProbability {
    fn from(raw: TokenLogProbV1) -> Self {
        Self {
            token: raw.token,
            log_probability: raw.logprob,
            top_log_probabilities: raw
                .top_logprobs
                .into_iter()
                .map(|top| TopLogProbability {
                    token: top.token,
                    log_probability: top.logprob,
                })
                .collect(),
        }
    }
}

fn convert_log_probs(raw: Option<Vec<TokenLogProbV1>>) -> Vec<TokenLogProbability> {
    raw.unwrap_or_default().into_iter().map(Into::into).collect()
}

impl TryFrom<ChatCompletionV1> for CompletionResult {
    type Error = ProbeError;

    fn try_from(raw: ChatCompletionV1) -> Result<Self> {
        if raw.object != CHAT_COMPLETION_OBJECT {
            return Err(ProbeError::MalformedResult(format!(
                "expected object '{}', got '{}'",
                CHAT_COMPLETION_OBJECT, raw.object
            )));
        }

        let created_at = DateTime::from_timestamp(raw.created, 0).ok_or_else(|| {
            ProbeError::MalformedResult(format!("created timestamp out of range: {}", raw.created))
        })?;

        let usage = raw
            .usage
            .ok_or_else(|| ProbeError::MalformedResult(format!("response {} has no usage", raw.id)))?;

        // Only the first choice is surfaced
        let choice = raw
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProbeError::MalformedResult(format!("response {} has no choices", raw.id)))?;

        let finish_reason = choice.finish_reason.ok_or_else(|| {
            ProbeError::MalformedResult(format!("response {} has no finish reason", raw.id))
        })?;

        let logprobs = choice.logprobs.unwrap_or_default();

        Ok(CompletionResult {
            id: raw.id,
            role: choice.message.role,
            content: choice
                .message
                .content
                .map(Content::into_parts)
                .unwrap_or_default(),
            refusal: choice.message.refusal.unwrap_or_default(),
            model: raw.model,
            created_at,
            finish_reason: FinishReason::from(finish_reason),
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
            system_fingerprint: raw.system_fingerprint.unwrap_or_default(),
            content_token_log_probabilities: convert_log_probs(logprobs.content),
            refusal_token_log_probabilities: convert_log_probs(logprobs.refusal),
        })
    }
}
