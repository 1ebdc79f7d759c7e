pub mod azure_openai;
pub mod credential;
pub mod error;
pub mod history;
pub mod traits;
pub mod types;

pub use traits::{ChatClient, ChatOptions, ChatRequest};

pub use azure_openai::{AzureOpenAIClient, ChatCompletionV1};
pub use credential::{
    AccessToken, AzureCliCredential, Credential, CredentialProvider, DefaultCredential,
    EnvironmentCredential, StaticCredential,
};
pub use error::{ProbeError, Result};
pub use history::ChatHistory;
pub use types::{
    ChatRole, CompletionResult, Content, ContentPart, FinishReason, Message, TokenLogProbability,
    TokenUsage, TopLogProbability,
};
