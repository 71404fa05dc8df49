//! Chat Completions client: the collaborator the chat adapter talks to.

use std::pin::Pin;

use async_stream::try_stream;
use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::Value as JsonValue;

use crate::ai_sdk_core::transport::{ByteStream, HttpTransport, TransportConfig};
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_streaming_sse::{SseDecoder, SseEvent};
use crate::provider_openai::api_types::{ChatCompletion, ChatCompletionChunk};
use crate::provider_openai::config::OpenAIConfig;
use crate::provider_openai::error::{error_from_body, map_transport_error};

const LOG_TARGET: &str = "ai_sdk::openai::client";

/// Ordered, finite stream of completion chunks. Nothing is read until polled.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, SdkError>> + Send>>;

/// Chat Completions endpoint as seen by the adapter.
///
/// `params` is the fully assembled request body; implementations send it as is.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    async fn create(&self, params: &JsonValue) -> Result<ChatCompletion, SdkError>;

    async fn create_stream(&self, params: &JsonValue) -> Result<ChunkStream, SdkError>;
}

pub struct OpenAIClient<T: HttpTransport = crate::reqwest_transport::ReqwestTransport> {
    config: OpenAIConfig,
    http: T,
    transport_cfg: TransportConfig,
}

impl<T: HttpTransport> OpenAIClient<T> {
    pub fn new(config: OpenAIConfig, http: T, transport_cfg: TransportConfig) -> Self {
        Self {
            config,
            http,
            transport_cfg,
        }
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl<T: HttpTransport + Send + Sync> ChatCompletions for OpenAIClient<T> {
    async fn create(&self, params: &JsonValue) -> Result<ChatCompletion, SdkError> {
        let url = self.config.endpoint_url();
        let (value, _headers) = self
            .http
            .post_json(&url, &self.config.headers, params, &self.transport_cfg)
            .await
            .map_err(map_transport_error)?;
        if let Some(err) = error_from_body(&value) {
            return Err(err);
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn create_stream(&self, params: &JsonValue) -> Result<ChunkStream, SdkError> {
        let url = self.config.endpoint_url();
        let resp = self
            .http
            .post_json_stream(&url, &self.config.headers, params, &self.transport_cfg)
            .await
            .map_err(map_transport_error)?;
        let (bytes, headers) = T::into_stream(resp);
        if let Some((_, request_id)) = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("x-request-id"))
        {
            tracing::debug!(target: LOG_TARGET, %request_id, "chat completion stream opened");
        }
        Ok(decode_chunk_stream(bytes))
    }
}

/// Decode an SSE byte stream into completion chunks, stopping at `[DONE]`.
///
/// A payload that is not a valid chunk fails the stream.
pub fn decode_chunk_stream(bytes: ByteStream) -> ChunkStream {
    Box::pin(try_stream! {
        let mut bytes = bytes;
        let mut decoder = SseDecoder::new();
        while let Some(next) = bytes.next().await {
            let chunk = next.map_err(map_transport_error)?;
            let events: Vec<SseEvent> = decoder.push(&chunk).collect();
            for event in events {
                if event.is_done() {
                    return;
                }
                yield parse_chunk(&event)?;
            }
        }
        let trailing: Vec<SseEvent> = decoder.finish().collect();
        for event in trailing {
            if event.is_done() {
                return;
            }
            yield parse_chunk(&event)?;
        }
    })
}

/// Decode one event payload. An `error` object in the payload fails the stream.
fn parse_chunk(event: &SseEvent) -> Result<ChatCompletionChunk, SdkError> {
    let value: JsonValue = serde_json::from_slice(&event.data).map_err(|err| {
        tracing::debug!(
            target: LOG_TARGET,
            error = %err,
            bytes = event.data.len(),
            "invalid completion chunk"
        );
        SdkError::Serde(err)
    })?;
    if let Some(err) = error_from_body(&value) {
        tracing::debug!(target: LOG_TARGET, error = %err, "error event in completion stream");
        return Err(err);
    }
    Ok(serde_json::from_value(value)?)
}
