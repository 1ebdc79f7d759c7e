use crate::types::{Content, Message};
use serde::{Deserialize, Serialize};

/// Ordered messages for a single request, seeded with a system prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new(system_prompt: impl Into<Content>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn add_user_message(&mut self, content: impl Into<Content>) -> &mut Self {
        self.messages.push(Message::user(content));
        self
    }

    pub fn add_assistant_message(&mut self, content: impl Into<Content>) -> &mut Self {
        self.messages.push(Message::assistant(content));
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<ChatHistory> for Vec<Message> {
    fn from(history: ChatHistory) -> Self {
        history.messages
    }
}
