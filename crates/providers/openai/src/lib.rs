//! OpenAI provider: Chat Completions client and chat adapter.

pub mod api_types;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use chat::OpenAIChatAdapter;
pub use client::{ChatCompletions, ChunkStream, OpenAIClient};
pub use config::OpenAIConfig;
pub use provider::create_openai_chat_adapter;

#[cfg(test)]
#[path = "../tests/tool_calls_tests.rs"]
mod tool_calls_tests;

#[cfg(test)]
#[path = "../tests/chat_params_tests.rs"]
mod chat_params_tests;

#[cfg(test)]
#[path = "../tests/chat_adapter_tests.rs"]
mod chat_adapter_tests;

#[cfg(test)]
#[path = "../tests/client_tests.rs"]
mod client_tests;
