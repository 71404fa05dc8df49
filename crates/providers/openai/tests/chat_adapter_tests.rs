use crate::ai_sdk_core::{dispatch, ChatAdapter, ChatResponse, ModelRequest, SdkError};
use crate::ai_sdk_types::{
    ChatMessage, ChatOptions, ChatRequest, EmbeddingsRequest, ResponseMessage, Role,
};
use crate::provider_openai::api_types::{ChatCompletion, ChatCompletionChunk};
use crate::provider_openai::chat::OpenAIChatAdapter;
use crate::provider_openai::client::{ChatCompletions, ChunkStream};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Replays canned payloads and records what the adapter sent.
#[derive(Default)]
struct FakeCompletions {
    completion: Option<Value>,
    chunks: Vec<Value>,
    last_params: Mutex<Option<Value>>,
    calls: AtomicUsize,
    pulled: Arc<AtomicUsize>,
}

impl FakeCompletions {
    fn completion(body: Value) -> Self {
        Self {
            completion: Some(body),
            ..Default::default()
        }
    }

    fn chunks(chunks: Vec<Value>) -> Self {
        Self {
            chunks,
            ..Default::default()
        }
    }

    fn last_params(&self) -> Value {
        self.last_params.lock().unwrap().clone().expect("params sent")
    }
}

#[async_trait]
impl ChatCompletions for FakeCompletions {
    async fn create(&self, params: &Value) -> Result<ChatCompletion, SdkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params.clone());
        let body = self.completion.clone().expect("completion fixture");
        Ok(serde_json::from_value(body)?)
    }

    async fn create_stream(&self, params: &Value) -> Result<ChunkStream, SdkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params.clone());
        let pulled = Arc::clone(&self.pulled);
        let items = self.chunks.clone().into_iter().map(move |value| {
            pulled.fetch_add(1, Ordering::SeqCst);
            serde_json::from_value::<ChatCompletionChunk>(value).map_err(SdkError::from)
        });
        Ok(Box::pin(stream::iter(items)))
    }
}

fn content_chunk(role: Option<&str>, text: &str) -> Value {
    let mut delta = json!({"content": text});
    if let Some(role) = role {
        delta["role"] = json!(role);
    }
    json!({"id": "chatcmpl-1", "choices": [{"index": 0, "delta": delta}]})
}

fn tool_chunk(fragment: Value) -> Value {
    json!({"id": "chatcmpl-1", "choices": [{"index": 0, "delta": {"tool_calls": [fragment]}}]})
}

fn hello_request(options: ChatOptions) -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("hi")]).with_options(options)
}

async fn drain(response: ChatResponse) -> Vec<ResponseMessage> {
    response.collect_messages().await.unwrap()
}

#[tokio::test]
async fn non_streamed_tool_calls_are_decoded() {
    let fake = FakeCompletions::completion(json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {"id": "call_1", "type": "function",
                     "function": {"name": "weather", "arguments": "{\"city\":\"Paris\"}"}},
                    {"id": "call_2", "type": "function",
                     "function": {"name": "time", "arguments": ""}}
                ]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
    }));
    let adapter = OpenAIChatAdapter::new("gpt-4o", fake);
    let response = adapter
        .handle_request(hello_request(ChatOptions::default()).into())
        .await
        .unwrap();
    let (message, usage) = response.into_complete().expect("complete response");
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content, "");
    assert_eq!(message.tool_calls.len(), 2);
    assert_eq!(message.tool_calls[0].name, "weather");
    assert_eq!(message.tool_calls[0].arguments.get("city"), Some(&json!("Paris")));
    assert!(message.tool_calls[1].arguments.is_empty());
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.completion_tokens, 8);
    assert_eq!(usage.total_tokens, 20);
}

#[tokio::test]
async fn non_streamed_text_has_no_tool_calls() {
    let fake = FakeCompletions::completion(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello!"}}],
        "usage": {"prompt_tokens": 3, "total_tokens": 5}
    }));
    let adapter = OpenAIChatAdapter::new("gpt-4o", fake);
    let response = adapter
        .chat(&hello_request(ChatOptions::default().with_temperature(0.7)))
        .await
        .unwrap();
    assert!(!response.is_streamed());
    let (message, usage) = response.into_complete().unwrap();
    assert_eq!(message.content, "Hello!");
    assert!(message.tool_calls.is_empty());
    assert_eq!(usage.completion_tokens, 0);

    let params = adapter.client().last_params();
    assert_eq!(params["model"], json!("gpt-4o"));
    assert_eq!(params["temperature"], json!(0.7));
    assert!(params.get("stream").is_none());
}

#[tokio::test]
async fn non_streamed_invalid_arguments_fail() {
    let fake = FakeCompletions::completion(json!({
        "choices": [{"index": 0, "message": {
            "role": "assistant",
            "tool_calls": [{"id": "c", "type": "function",
                            "function": {"name": "f", "arguments": "{oops"}}]
        }}]
    }));
    let adapter = OpenAIChatAdapter::new("m", fake);
    let err = adapter
        .chat(&hello_request(ChatOptions::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Serde(_)), "{err:?}");
}

#[tokio::test]
async fn streamed_text_then_tool_call_then_nothing() {
    let fake = FakeCompletions::chunks(vec![
        content_chunk(Some("assistant"), "Let me "),
        content_chunk(None, "check."),
        tool_chunk(json!({"index": 0, "id": "call_1", "type": "function",
                          "function": {"name": "weather", "arguments": "{\"ci"}})),
        tool_chunk(json!({"index": 0, "function": {"arguments": "ty\":\"Ro"}})),
        tool_chunk(json!({"index": 0, "function": {"arguments": "me\"}"}})),
        content_chunk(None, "trailing text"),
        json!({"id": "chatcmpl-1", "choices": [],
               "usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}}),
    ]);
    let adapter = OpenAIChatAdapter::new("gpt-4o", fake);
    let response = adapter
        .chat(&hello_request(ChatOptions::default().streamed(true)))
        .await
        .unwrap();
    assert!(response.is_streamed());
    let messages = drain(response).await;

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], ResponseMessage::text(Role::Assistant, "Let me "));
    assert_eq!(messages[1], ResponseMessage::text(Role::Assistant, "check."));
    let call_msg = &messages[2];
    assert_eq!(call_msg.content, "");
    assert_eq!(call_msg.tool_calls.len(), 1);
    assert_eq!(call_msg.tool_calls[0].id, "call_1");
    assert_eq!(call_msg.tool_calls[0].arguments.get("city"), Some(&json!("Rome")));
    assert!(messages.iter().all(|m| m.content != "trailing text"));

    let params = adapter.client().last_params();
    assert_eq!(params["stream"], json!(true));
    assert_eq!(params["stream_options"], json!({"include_usage": true}));
}

#[tokio::test]
async fn streamed_role_is_latched_from_first_delta() {
    let fake = FakeCompletions::chunks(vec![
        content_chunk(Some("system"), "a"),
        content_chunk(Some("user"), "b"),
        json!({"choices": [{"index": 0, "delta": {}}]}),
        content_chunk(None, "c"),
    ]);
    let adapter = OpenAIChatAdapter::new("m", fake);
    let messages = drain(
        adapter
            .chat(&hello_request(ChatOptions::default().streamed(true)))
            .await
            .unwrap(),
    )
    .await;
    let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["a", "b", "c"]);
    assert!(messages.iter().all(|m| m.role == Role::System));
}

#[tokio::test]
async fn streamed_role_defaults_to_assistant() {
    let fake = FakeCompletions::chunks(vec![content_chunk(None, "x")]);
    let adapter = OpenAIChatAdapter::new("m", fake);
    let messages = drain(
        adapter
            .chat(&hello_request(ChatOptions::default().streamed(true)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(messages, vec![ResponseMessage::text(Role::Assistant, "x")]);
}

#[tokio::test]
async fn streamed_two_tool_calls_become_two_messages() {
    let fake = FakeCompletions::chunks(vec![
        tool_chunk(json!({"index": 0, "id": "call_1", "type": "function",
                          "function": {"name": "a", "arguments": "{}"}})),
        tool_chunk(json!({"index": 1, "id": "call_2", "type": "function",
                          "function": {"name": "b", "arguments": ""}})),
        tool_chunk(json!({"index": 1, "function": {"arguments": "{\"k\":1}"}})),
    ]);
    let adapter = OpenAIChatAdapter::new("m", fake);
    let messages = drain(
        adapter
            .chat(&hello_request(ChatOptions::default().streamed(true)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].tool_calls[0].name, "a");
    assert_eq!(messages[1].tool_calls[0].name, "b");
    assert_eq!(messages[1].tool_calls[0].arguments.get("k"), Some(&json!(1)));
}

#[tokio::test]
async fn stream_is_lazy() {
    let fake = FakeCompletions::chunks(vec![
        content_chunk(None, "one"),
        content_chunk(None, "two"),
        content_chunk(None, "three"),
    ]);
    let pulled = Arc::clone(&fake.pulled);
    let adapter = OpenAIChatAdapter::new("m", fake);
    let mut stream = adapter
        .chat(&hello_request(ChatOptions::default().streamed(true)))
        .await
        .unwrap()
        .into_stream()
        .unwrap();
    assert_eq!(pulled.load(Ordering::SeqCst), 0);
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.content, "one");
    assert_eq!(pulled.load(Ordering::SeqCst), 1);
    drop(stream);
    assert_eq!(pulled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_format_fails_before_calling_the_client() {
    let adapter = OpenAIChatAdapter::new("m", FakeCompletions::default());
    let err = adapter
        .chat(&hello_request(ChatOptions::default().with_format("xml")))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidArgument { .. }));
    assert_eq!(adapter.client().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn supports_only_chat_requests() {
    let adapter = OpenAIChatAdapter::new("m", FakeCompletions::default());
    let chat: ModelRequest = hello_request(ChatOptions::default()).into();
    let embeddings: ModelRequest = EmbeddingsRequest::new(vec!["x".into()]).into();
    assert!(adapter.supports(&chat));
    assert!(!adapter.supports(&embeddings));

    let err = adapter.handle_request(embeddings).await.unwrap_err();
    assert!(matches!(err, SdkError::InvalidArgument { .. }));
    assert_eq!(adapter.client().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dispatch_routes_chat_to_openai_adapter() {
    let fake = FakeCompletions::completion(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "routed"}}]
    }));
    let adapters: Vec<Arc<dyn ChatAdapter>> = vec![Arc::new(OpenAIChatAdapter::new("m", fake))];
    let response = dispatch(&adapters, hello_request(ChatOptions::default()).into())
        .await
        .unwrap();
    let (message, _) = response.into_complete().unwrap();
    assert_eq!(message.content, "routed");

    let err = dispatch(&adapters, EmbeddingsRequest::new(vec!["x".into()]).into())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidArgument { .. }));
}
