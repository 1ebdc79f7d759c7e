use crate::error::Result;
use crate::types::{CompletionResult, Message};
use async_trait::async_trait;

/// Trait for non-streaming chat completions
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one conversation and return the first choice with its diagnostics
    async fn complete(&self, request: ChatRequest) -> Result<CompletionResult>;
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Deployment name on Azure; it selects the URL, not a body field
    pub model: String,
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: impl Into<Vec<Message>>) -> Self {
        Self {
            model: model.into(),
            messages: messages.into(),
            options: ChatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub logprobs: Option<bool>,
    /// Number of alternatives per token (0..=20); requires `logprobs`
    pub top_logprobs: Option<u8>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Ask for token log probabilities with `top` alternatives each
    pub fn log_probabilities(mut self, top: u8) -> Self {
        self.logprobs = Some(true);
        self.top_logprobs = Some(top);
        self
    }
}
