//! Unified type definitions for the ai-sdk chat abstraction
//!
//! These are the provider-neutral shapes exchanged between the calling
//! application and an adapter: requests, response messages, tool calls and
//! token usage.

pub mod chat;
pub mod embedding;
pub mod usage;

use serde::{Deserialize, Serialize};

pub use chat::{
    ChatMessage, ChatOptions, ChatRequest, ResponseFormat, ResponseMessage, ToolCall,
    ToolCallType, ToolChoice, ToolDefinition,
};
pub use embedding::EmbeddingsRequest;
pub use usage::Usage;

/// Basic roles for chat messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    /// Map a provider role string onto a known role.
    ///
    /// `developer` is OpenAI's newer alias for `system`. Anything unknown is
    /// treated as the assistant, which is the only role a completion produces.
    pub fn from_wire(role: &str) -> Self {
        match role {
            "system" | "developer" => Role::System,
            "user" => Role::User,
            "tool" => Role::Tool,
            _ => Role::Assistant,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../tests/chat_types_tests.rs"]
mod chat_types_tests;
