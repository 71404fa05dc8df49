use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::ai_sdk_types::{ToolChoice, ToolDefinition};

pub struct PreparedTools {
    pub tools: Option<Vec<JsonValue>>,
    pub tool_choice: Option<JsonValue>,
}

/// Map declared tools onto the function-calling schema.
///
/// Without tools nothing is sent, including the tool choice.
pub fn prepare_tools(tools: &[ToolDefinition], tool_choice: Option<&ToolChoice>) -> PreparedTools {
    if tools.is_empty() {
        return PreparedTools {
            tools: None,
            tool_choice: None,
        };
    }

    let openai_tools = tools.iter().map(function_tool).collect::<Vec<_>>();

    let tool_choice_val = tool_choice.map(|choice| match choice {
        ToolChoice::Auto => json!("auto"),
        ToolChoice::None => json!("none"),
        ToolChoice::Required => json!("required"),
        ToolChoice::Function { name } => json!({"type": "function", "function": {"name": name}}),
    });

    PreparedTools {
        tools: Some(openai_tools),
        tool_choice: tool_choice_val,
    }
}

fn function_tool(tool: &ToolDefinition) -> JsonValue {
    let mut function = JsonMap::new();
    function.insert("name".into(), json!(tool.name));
    if let Some(description) = &tool.description {
        function.insert("description".into(), json!(description));
    }
    function.insert("parameters".into(), tool.parameters.clone());
    json!({"type": "function", "function": JsonValue::Object(function)})
}
