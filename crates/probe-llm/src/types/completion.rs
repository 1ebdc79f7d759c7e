use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::content::ContentPart;
use super::message::ChatRole;

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    FunctionCall,
    Other(String),
}

impl FinishReason {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ContentFilter => "content_filter",
            Self::ToolCalls => "tool_calls",
            Self::FunctionCall => "function_call",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for FinishReason {
    fn from(s: String) -> Self {
        match s.as_str() {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            "tool_calls" => Self::ToolCalls,
            "function_call" => Self::FunctionCall,
            _ => Self::Other(s),
        }
    }
}

impl From<FinishReason> for String {
    fn from(reason: FinishReason) -> Self {
        reason.as_str().to_string()
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    /// `total == input + output`, as reported by the service
    pub fn is_consistent(&self) -> bool {
        u64::from(self.input_tokens) + u64::from(self.output_tokens)
            == u64::from(self.total_tokens)
    }
}

/// One alternative the model considered at a token position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLogProbability {
    pub token: String,
    pub log_probability: f64,
}

/// Log probability of a generated token plus its top-K alternatives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenLogProbability {
    pub token: String,
    pub log_probability: f64,
    /// Alternatives in the order the service delivered them
    pub top_log_probabilities: Vec<TopLogProbability>,
}

impl TokenLogProbability {
    pub fn new(token: impl Into<String>, log_probability: f64) -> Self {
        Self {
            token: token.into(),
            log_probability,
            top_log_probabilities: Vec::new(),
        }
    }

    pub fn with_alternative(mut self, token: impl Into<String>, log_probability: f64) -> Self {
        self.top_log_probabilities.push(TopLogProbability {
            token: token.into(),
            log_probability,
        });
        self
    }
}

/// A single chat completion with all of its diagnostic metadata.
///
/// Built once per call from the response schema and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub id: String,
    pub role: ChatRole,
    /// Ordered content segments; empty when the service returned no content
    pub content: Vec<ContentPart>,
    /// Empty when the model did not refuse
    pub refusal: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
    /// Empty when the service did not report one
    pub system_fingerprint: String,
    pub content_token_log_probabilities: Vec<TokenLogProbability>,
    pub refusal_token_log_probabilities: Vec<TokenLogProbability>,
}

impl CompletionResult {
    /// Text of the first content segment
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ContentPart::text)
    }
}
