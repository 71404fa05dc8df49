use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_types::{ChatRequest, ResponseFormat, ToolChoice};
use crate::provider_openai::chat::convert::convert_to_openai_chat_messages as convert_messages;
use crate::provider_openai::chat::prepare_tools::prepare_tools;

const LOG_TARGET: &str = "ai_sdk::openai::chat";

/// Build the Chat Completions request body for `request`.
///
/// Option values are validated first, so a bad `format` or `toolChoice`
/// never reaches the network. `seed` and `temperature` are only forwarded
/// when non-zero.
pub fn build_chat_params(model_id: &str, request: &ChatRequest) -> Result<JsonValue, SdkError> {
    let options = &request.options;
    let response_format =
        ResponseFormat::parse(options.format.as_deref()).map_err(SdkError::invalid_argument)?;
    let tool_choice = options
        .tool_choice
        .as_deref()
        .map(str::parse::<ToolChoice>)
        .transpose()
        .map_err(SdkError::invalid_argument)?;

    let mut body = JsonMap::new();
    body.insert("model".into(), json!(model_id));
    body.insert(
        "messages".into(),
        JsonValue::Array(convert_messages(&request.messages)),
    );

    if let Some(ResponseFormat::Json) = response_format {
        body.insert("response_format".into(), json!({"type": "json_object"}));
    }

    match options.seed {
        Some(seed) if seed != 0 => {
            body.insert("seed".into(), json!(seed));
        }
        Some(_) => tracing::debug!(target: LOG_TARGET, "seed of 0 is treated as unset"),
        None => {}
    }
    match options.temperature {
        Some(t) if t != 0.0 => {
            body.insert("temperature".into(), json!(t));
        }
        Some(_) => tracing::debug!(target: LOG_TARGET, "temperature of 0 is treated as unset"),
        None => {}
    }

    let prep = prepare_tools(&request.tools, tool_choice.as_ref());
    if let Some(tools) = prep.tools {
        body.insert("tools".into(), JsonValue::Array(tools));
    }
    if let Some(choice) = prep.tool_choice {
        body.insert("tool_choice".into(), choice);
    }

    if options.streamed {
        body.insert("stream".into(), JsonValue::Bool(true));
        body.insert("stream_options".into(), json!({"include_usage": true}));
    }

    tracing::trace!(
        target: LOG_TARGET,
        model = model_id,
        messages = request.messages.len(),
        tools = request.tools.len(),
        streamed = options.streamed,
        "built chat params"
    );
    Ok(JsonValue::Object(body))
}
