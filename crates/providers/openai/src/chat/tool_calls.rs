//! Rebuilds complete tool calls from streamed fragments.
//!
//! A fragment carrying an `id` starts a new call; fragments without one
//! continue the call in progress. Argument text is concatenated in arrival
//! order and decoded once, when the call is complete.

use std::pin::Pin;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::ai_sdk_core::json::decode_arguments;
use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::{ToolCall, ToolCallType};
use crate::provider_openai::api_types::ToolCallChunk;
use crate::provider_openai::chat::log_stream_usage;
use crate::provider_openai::client::ChunkStream;

pub type ToolCallStream = Pin<Box<dyn Stream<Item = Result<ToolCall, SdkError>> + Send>>;

#[derive(Debug)]
struct PendingToolCall {
    id: String,
    call_type: ToolCallType,
    name: Option<String>,
    arguments: Vec<String>,
}

impl PendingToolCall {
    fn start(fragment: &ToolCallChunk) -> Result<Self, SdkError> {
        let id = fragment.id.clone().ok_or_else(|| {
            SdkError::malformed_tool_call("first tool call fragment has no id")
        })?;
        Ok(Self {
            id,
            call_type: ToolCallType::from_wire(fragment.call_type.as_deref()),
            name: fragment.function.name.clone(),
            arguments: Vec::new(),
        })
    }

    fn append_arguments(&mut self, fragment: &ToolCallChunk) {
        if let Some(text) = &fragment.function.arguments {
            self.arguments.push(text.clone());
        }
    }

    fn finish(self) -> Result<ToolCall, SdkError> {
        let Some(name) = self.name.filter(|n| !n.is_empty()) else {
            return Err(SdkError::malformed_tool_call(format!(
                "tool call '{}' has no function name",
                self.id
            )));
        };
        let arguments = decode_arguments(&self.arguments.concat())?;
        Ok(ToolCall {
            id: self.id,
            call_type: self.call_type,
            name,
            arguments,
        })
    }
}

/// Accumulator for one reconstruction pass.
///
/// Holds exactly one pending call at a time. Starting a new call swaps the
/// pending one out and finishes it in the same step, so callers never see a
/// half-reset state.
#[derive(Debug)]
pub struct ToolCallAccumulator {
    pending: PendingToolCall,
}

impl ToolCallAccumulator {
    /// Seed from the fragment that opened the first call; it must carry an id.
    pub fn new(first: &ToolCallChunk) -> Result<Self, SdkError> {
        let mut pending = PendingToolCall::start(first)?;
        pending.append_arguments(first);
        Ok(Self { pending })
    }

    /// Feed the next fragment. Returns the previous call when this one starts a new call.
    pub fn push(&mut self, fragment: &ToolCallChunk) -> Result<Option<ToolCall>, SdkError> {
        let completed = if fragment.id.is_some() {
            let next = PendingToolCall::start(fragment)?;
            let previous = std::mem::replace(&mut self.pending, next);
            Some(previous.finish()?)
        } else {
            None
        };
        self.pending.append_arguments(fragment);
        Ok(completed)
    }

    /// Finish the last pending call.
    pub fn finish(self) -> Result<ToolCall, SdkError> {
        self.pending.finish()
    }
}

/// Reconstruct tool calls from `initial` (the fragments of the delta that
/// opened the first call) followed by everything left in `rest`.
///
/// Calls are yielded in the order they began; the last one is yielded when
/// `rest` is exhausted.
pub fn reconstruct_tool_calls(initial: Vec<ToolCallChunk>, rest: ChunkStream) -> ToolCallStream {
    Box::pin(try_stream! {
        let mut rest = rest;
        let mut fragments = initial.into_iter();
        let Some(first) = fragments.next() else {
            return;
        };
        let mut acc = ToolCallAccumulator::new(&first)?;
        for fragment in fragments {
            if let Some(call) = acc.push(&fragment)? {
                yield call;
            }
        }

        while let Some(next) = rest.next().await {
            let chunk = next?;
            log_stream_usage(&chunk);
            let Some(delta) = chunk.into_delta() else {
                continue;
            };
            for fragment in delta.tool_calls.unwrap_or_default() {
                if let Some(call) = acc.push(&fragment)? {
                    yield call;
                }
            }
        }

        yield acc.finish()?;
    })
}
