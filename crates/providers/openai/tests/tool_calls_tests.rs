use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::{ToolCall, ToolCallType, Usage};
use crate::provider_openai::api_types::{
    ChatCompletionChunk, ChunkChoice, ChunkDelta, FunctionCallChunk, ToolCallChunk,
};
use crate::provider_openai::chat::{reconstruct_tool_calls, ToolCallAccumulator};
use crate::provider_openai::client::ChunkStream;
use futures_util::{stream, StreamExt};
use serde_json::json;

fn start(id: &str, name: &str, args: &str) -> ToolCallChunk {
    ToolCallChunk {
        index: 0,
        id: Some(id.into()),
        call_type: Some("function".into()),
        function: FunctionCallChunk {
            name: Some(name.into()),
            arguments: Some(args.into()),
        },
    }
}

fn cont(args: &str) -> ToolCallChunk {
    ToolCallChunk {
        function: FunctionCallChunk {
            name: None,
            arguments: Some(args.into()),
        },
        ..Default::default()
    }
}

fn chunk_with(fragments: Vec<ToolCallChunk>) -> ChatCompletionChunk {
    ChatCompletionChunk {
        choices: vec![ChunkChoice {
            delta: ChunkDelta {
                tool_calls: Some(fragments),
                ..Default::default()
            },
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn chunks(items: Vec<ChatCompletionChunk>) -> ChunkStream {
    Box::pin(stream::iter(items.into_iter().map(Ok::<_, SdkError>)))
}

async fn collect(initial: Vec<ToolCallChunk>, rest: ChunkStream) -> Result<Vec<ToolCall>, SdkError> {
    let mut out = Vec::new();
    let mut calls = reconstruct_tool_calls(initial, rest);
    while let Some(call) = calls.next().await {
        out.push(call?);
    }
    Ok(out)
}

#[tokio::test]
async fn split_arguments_produce_one_call_for_any_split() {
    let text = r#"{"city":"Paris","units":"metric"}"#;
    for n in 1..=text.len() {
        let pieces: Vec<String> = text
            .as_bytes()
            .chunks(text.len().div_ceil(n))
            .map(|p| String::from_utf8(p.to_vec()).unwrap())
            .collect();
        let rest = pieces[1..]
            .iter()
            .map(|p| chunk_with(vec![cont(p)]))
            .collect();
        let calls = collect(vec![start("call_1", "weather", &pieces[0])], chunks(rest))
            .await
            .unwrap();
        assert_eq!(calls.len(), 1, "split into {n}");
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "weather");
        assert_eq!(
            serde_json::Value::Object(calls[0].arguments.clone()),
            json!({"city": "Paris", "units": "metric"})
        );
    }
}

#[tokio::test]
async fn consecutive_calls_are_emitted_in_order_without_mixing() {
    let rest = chunks(vec![
        chunk_with(vec![cont("\"a\":1}")]),
        chunk_with(vec![start("call_2", "second", "{\"b\":")]),
        chunk_with(vec![cont("2}")]),
    ]);
    let calls = collect(vec![start("call_1", "first", "{")], rest)
        .await
        .unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].id, "call_1");
    assert_eq!(calls[0].name, "first");
    assert_eq!(calls[0].arguments.get("a"), Some(&json!(1)));
    assert!(calls[0].arguments.get("b").is_none());
    assert_eq!(calls[1].id, "call_2");
    assert_eq!(calls[1].name, "second");
    assert_eq!(calls[1].arguments.get("b"), Some(&json!(2)));
    assert!(calls[1].arguments.get("a").is_none());
}

#[tokio::test]
async fn several_calls_in_the_opening_delta() {
    let initial = vec![start("call_1", "first", "{}"), start("call_2", "second", "{}")];
    let calls = collect(initial, chunks(vec![])).await.unwrap();
    let ids: Vec<_> = calls.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["call_1", "call_2"]);
}

#[tokio::test]
async fn empty_arguments_decode_to_empty_object() {
    let calls = collect(vec![start("call_1", "now", "")], chunks(vec![]))
        .await
        .unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].arguments.is_empty());
    assert_eq!(calls[0].call_type, ToolCallType::Function);
}

#[tokio::test]
async fn chunks_without_choices_are_ignored() {
    let rest = chunks(vec![
        ChatCompletionChunk::default(),
        chunk_with(vec![cont("{\"x\":true}")]),
    ]);
    let calls = collect(vec![start("call_1", "flag", "")], rest)
        .await
        .unwrap();
    assert_eq!(calls[0].arguments.get("x"), Some(&json!(true)));
}

#[tokio::test]
async fn missing_id_on_first_fragment_is_malformed() {
    let err = collect(vec![cont("{}")], chunks(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::MalformedToolCall { .. }), "{err:?}");
}

#[tokio::test]
async fn missing_name_is_malformed() {
    let mut first = start("call_1", "", "{}");
    first.function.name = None;
    let err = collect(vec![first], chunks(vec![])).await.unwrap_err();
    assert!(matches!(err, SdkError::MalformedToolCall { .. }), "{err:?}");
}

#[tokio::test]
async fn invalid_argument_json_is_serde_error() {
    let rest = chunks(vec![chunk_with(vec![cont("\"a\":")])]);
    let err = collect(vec![start("call_1", "broken", "{")], rest)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Serde(_)), "{err:?}");
}

#[tokio::test]
async fn non_object_arguments_are_rejected() {
    let err = collect(vec![start("call_1", "list", "[1,2]")], chunks(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Serde(_)), "{err:?}");
}

#[tokio::test]
async fn upstream_error_mid_stream_is_propagated() {
    let rest: ChunkStream = Box::pin(stream::iter(vec![
        Ok(chunk_with(vec![cont("{")])),
        Err(SdkError::Timeout),
    ]));
    let err = collect(vec![start("call_1", "slow", "")], rest)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Timeout));
}

#[test]
fn accumulator_swaps_pending_call_on_new_id() {
    let mut acc = ToolCallAccumulator::new(&start("call_1", "first", "{\"n\":")).unwrap();
    assert!(acc.push(&cont("1}")).unwrap().is_none());
    let done = acc
        .push(&start("call_2", "second", "{}"))
        .unwrap()
        .expect("first call completes");
    assert_eq!(done.id, "call_1");
    assert_eq!(done.arguments.get("n"), Some(&json!(1)));
    let last = acc.finish().unwrap();
    assert_eq!(last.name, "second");
}

#[tokio::test]
async fn usage_trailer_after_tool_calls_does_not_end_reconstruction_early() {
    let trailer = ChatCompletionChunk {
        usage: Some(Usage::new(10, 5, 15)),
        ..Default::default()
    };
    let rest = chunks(vec![chunk_with(vec![cont("{\"q\":1}")]), trailer]);
    let calls = collect(vec![start("call_1", "search", "")], rest)
        .await
        .unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].arguments.get("q"), Some(&json!(1)));
}
