use async_stream::try_stream;
use futures_util::StreamExt;

use crate::ai_sdk_core::json::decode_arguments;
use crate::ai_sdk_core::{ChatAdapter, ChatResponse, MessageStream, ModelRequest, SdkError};
use crate::ai_sdk_types::{ChatRequest, ResponseMessage, Role, ToolCall, ToolCallType, Usage};
use crate::provider_openai::api_types::{ChatCompletion, MessageToolCall};
use crate::provider_openai::chat::log_stream_usage;
use crate::provider_openai::chat::params::build_chat_params;
use crate::provider_openai::chat::tool_calls::reconstruct_tool_calls;
use crate::provider_openai::client::{ChatCompletions, ChunkStream, OpenAIClient};

const LOG_TARGET: &str = "ai_sdk::openai::chat";

/// Chat adapter over the OpenAI Chat Completions API.
///
/// Stateless between calls: every request builds its own params and, when
/// streamed, its own reconstruction state.
pub struct OpenAIChatAdapter<C: ChatCompletions = OpenAIClient> {
    model_id: String,
    client: C,
}

impl<C: ChatCompletions> OpenAIChatAdapter<C> {
    pub fn new(model_id: impl Into<String>, client: C) -> Self {
        Self {
            model_id: model_id.into(),
            client,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one chat request, streamed or not depending on `options.streamed`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, SdkError> {
        let params = build_chat_params(&self.model_id, request)?;
        if request.is_streamed() {
            let chunks = self.client.create_stream(&params).await?;
            return Ok(ChatResponse::Streamed(stream_messages(chunks)));
        }

        let completion = self.client.create(&params).await?;
        let (message, usage) = convert_completion(completion)?;
        tracing::debug!(
            target: LOG_TARGET,
            model = %self.model_id,
            tool_calls = message.tool_calls.len(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completion finished"
        );
        Ok(ChatResponse::Complete { message, usage })
    }
}

#[async_trait::async_trait]
impl<C: ChatCompletions> ChatAdapter for OpenAIChatAdapter<C> {
    fn name(&self) -> &'static str {
        "openai.chat"
    }

    fn supports(&self, request: &ModelRequest) -> bool {
        matches!(request, ModelRequest::Chat(_))
    }

    async fn handle_request(&self, request: ModelRequest) -> Result<ChatResponse, SdkError> {
        match request {
            ModelRequest::Chat(chat) => self.chat(&chat).await,
            other => Err(SdkError::invalid_argument(format!(
                "{} does not handle {} requests",
                self.name(),
                other.kind()
            ))),
        }
    }
}

fn convert_completion(completion: ChatCompletion) -> Result<(ResponseMessage, Usage), SdkError> {
    let usage = completion.usage.unwrap_or_default();
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(SdkError::invalid_response("chat completion has no choices"));
    };
    let message = choice.message;
    let role = message
        .role
        .as_deref()
        .map(Role::from_wire)
        .unwrap_or(Role::Assistant);
    let content = message.content.unwrap_or_default();
    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(convert_tool_call)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((
        ResponseMessage::with_tool_calls(role, content, tool_calls),
        usage,
    ))
}

fn convert_tool_call(call: MessageToolCall) -> Result<ToolCall, SdkError> {
    Ok(ToolCall {
        id: call.id,
        call_type: ToolCallType::from_wire(call.call_type.as_deref()),
        name: call.function.name,
        arguments: decode_arguments(&call.function.arguments)?,
    })
}

/// Turn completion chunks into response messages, one per chunk advanced.
///
/// Content deltas become text messages. The first delta that carries tool-call
/// fragments hands the rest of `chunks` to the reconstructor; every completed
/// call becomes its own message and nothing is produced after that.
fn stream_messages(chunks: ChunkStream) -> MessageStream {
    Box::pin(try_stream! {
        let mut chunks = chunks;
        let mut role: Option<Role> = None;
        while let Some(next) = chunks.next().await {
            let chunk = next?;
            log_stream_usage(&chunk);
            let Some(delta) = chunk.into_delta() else {
                continue;
            };
            let current = *role.get_or_insert_with(|| {
                delta
                    .role
                    .as_deref()
                    .map(Role::from_wire)
                    .unwrap_or(Role::Assistant)
            });

            if delta.has_tool_calls() {
                let fragments = delta.tool_calls.unwrap_or_default();
                let mut calls = reconstruct_tool_calls(fragments, chunks);
                while let Some(call) = calls.next().await {
                    let call = call?;
                    yield ResponseMessage::with_tool_calls(current, "", vec![call]);
                }
                return;
            }

            if let Some(content) = delta.content {
                yield ResponseMessage::text(current, content);
            }
        }
    })
}
