use serde_json::{Map as JsonMap, Value};

/// Drop every object entry whose value is `null`, at any depth.
///
/// Array elements are left in place even when null so indices keep their meaning.
pub fn strip_null_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_null_fields);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_null_fields),
        _ => {}
    }
}

/// Copy of `value` with null object fields removed.
pub fn without_null_fields(value: &Value) -> Value {
    let mut out = value.clone();
    strip_null_fields(&mut out);
    out
}

/// Decode tool-call argument text into a key/value object.
///
/// The text must be a complete JSON object. Empty or whitespace-only text is
/// an empty object, which is what providers send for zero-argument functions.
pub fn decode_arguments(text: &str) -> Result<JsonMap<String, Value>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(JsonMap::new());
    }
    serde_json::from_str(text)
}
