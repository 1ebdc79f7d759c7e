pub mod client;
pub mod schema;

pub use client::{AzureOpenAIClient, AzureOpenAIClientBuilder, DEFAULT_API_VERSION, MAX_TOP_LOGPROBS};
pub use schema::{ChatCompletionV1, CHAT_COMPLETION_OBJECT};
