pub mod completion;
pub mod content;
pub mod message;

pub use completion::{
    CompletionResult, FinishReason, TokenLogProbability, TokenUsage, TopLogProbability,
};
pub use content::{Content, ContentPart};
pub use message::{ChatRole, Message};
