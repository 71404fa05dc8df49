//! Chat Completions adapter: request params, message flattening, tool-call
//! reconstruction and response assembly.

pub mod adapter;
pub mod convert;
pub mod params;
pub mod prepare_tools;
pub mod tool_calls;

pub use adapter::OpenAIChatAdapter;
pub use params::build_chat_params;
pub use tool_calls::{reconstruct_tool_calls, ToolCallAccumulator, ToolCallStream};

use crate::provider_openai::api_types::ChatCompletionChunk;

/// Log the usage trailer a streamed response ends with, if `chunk` carries it.
pub(crate) fn log_stream_usage(chunk: &ChatCompletionChunk) {
    if let Some(usage) = &chunk.usage {
        tracing::debug!(
            target: "ai_sdk::openai::chat",
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "stream usage"
        );
    }
}
