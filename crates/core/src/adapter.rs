//! Adapter interface between the generic chat abstraction and a provider.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use futures_util::StreamExt;

use crate::ai_sdk_types::{ChatRequest, EmbeddingsRequest, ResponseMessage, Usage};
use crate::core::SdkError;

/// Lazy, single-pass sequence of response messages.
///
/// Each poll pulls at most the next provider chunk; dropping the stream stops
/// consumption.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<ResponseMessage, SdkError>> + Send>>;

/// Request envelope seen by a dispatch layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRequest {
    Chat(ChatRequest),
    Embeddings(EmbeddingsRequest),
}

impl ModelRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelRequest::Chat(_) => "chat",
            ModelRequest::Embeddings(_) => "embeddings",
        }
    }
}

impl From<ChatRequest> for ModelRequest {
    fn from(value: ChatRequest) -> Self {
        ModelRequest::Chat(value)
    }
}

impl From<EmbeddingsRequest> for ModelRequest {
    fn from(value: EmbeddingsRequest) -> Self {
        ModelRequest::Embeddings(value)
    }
}

/// Result of a chat call.
pub enum ChatResponse {
    /// Non-streamed: one fully populated message plus token usage.
    Complete {
        message: ResponseMessage,
        usage: Usage,
    },
    /// Streamed: messages are produced as the provider stream is consumed.
    Streamed(MessageStream),
}

impl ChatResponse {
    pub fn is_streamed(&self) -> bool {
        matches!(self, ChatResponse::Streamed(_))
    }

    pub fn into_complete(self) -> Option<(ResponseMessage, Usage)> {
        match self {
            ChatResponse::Complete { message, usage } => Some((message, usage)),
            ChatResponse::Streamed(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<MessageStream> {
        match self {
            ChatResponse::Streamed(stream) => Some(stream),
            ChatResponse::Complete { .. } => None,
        }
    }

    /// Drain the response into a list of messages, stopping at the first error.
    pub async fn collect_messages(self) -> Result<Vec<ResponseMessage>, SdkError> {
        match self {
            ChatResponse::Complete { message, .. } => Ok(vec![message]),
            ChatResponse::Streamed(mut stream) => {
                let mut out = Vec::new();
                while let Some(item) = stream.next().await {
                    out.push(item?);
                }
                Ok(out)
            }
        }
    }
}

impl fmt::Debug for ChatResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatResponse::Complete { message, usage } => f
                .debug_struct("Complete")
                .field("message", message)
                .field("usage", usage)
                .finish(),
            ChatResponse::Streamed(_) => f.write_str("Streamed(..)"),
        }
    }
}

/// A provider adapter for chat requests.
#[async_trait::async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &'static str;

    /// Whether this adapter understands the request kind.
    fn supports(&self, request: &ModelRequest) -> bool;

    async fn handle_request(&self, request: ModelRequest) -> Result<ChatResponse, SdkError>;
}

/// Route `request` to the first adapter that supports it.
pub async fn dispatch(
    adapters: &[Arc<dyn ChatAdapter>],
    request: ModelRequest,
) -> Result<ChatResponse, SdkError> {
    let Some(adapter) = adapters.iter().find(|a| a.supports(&request)) else {
        return Err(SdkError::invalid_argument(format!(
            "no adapter supports {} requests",
            request.kind()
        )));
    };
    tracing::debug!(
        target: "ai_sdk::dispatch",
        adapter = adapter.name(),
        kind = request.kind(),
        "dispatching request"
    );
    adapter.handle_request(request).await
}
