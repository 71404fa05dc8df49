use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::ai_sdk_types::{ChatMessage, Role, ToolCall};

/// Flatten chat messages into OpenAI message objects.
pub fn convert_to_openai_chat_messages(messages: &[ChatMessage]) -> Vec<JsonValue> {
    messages.iter().map(convert_message).collect()
}

fn convert_message(message: &ChatMessage) -> JsonValue {
    let mut obj = JsonMap::new();
    obj.insert("role".into(), json!(message.role.as_str()));
    match message.role {
        Role::Assistant if !message.tool_calls.is_empty() => {
            // OpenAI expects null rather than "" next to tool calls
            let content = if message.content.is_empty() {
                JsonValue::Null
            } else {
                json!(message.content)
            };
            obj.insert("content".into(), content);
            obj.insert(
                "tool_calls".into(),
                JsonValue::Array(message.tool_calls.iter().map(convert_tool_call).collect()),
            );
        }
        Role::Tool => {
            obj.insert("content".into(), json!(message.content));
            if let Some(id) = &message.tool_call_id {
                obj.insert("tool_call_id".into(), json!(id));
            }
        }
        _ => {
            obj.insert("content".into(), json!(message.content));
        }
    }
    JsonValue::Object(obj)
}

fn convert_tool_call(call: &ToolCall) -> JsonValue {
    json!({
        "id": call.id,
        "type": call.call_type.as_str(),
        "function": {
            "name": call.name,
            "arguments": JsonValue::Object(call.arguments.clone()).to_string(),
        }
    })
}
