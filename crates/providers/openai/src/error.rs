use crate::ai_sdk_core::error::{display_body_for_error, SdkError, TransportError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OpenAIErrorEnvelope {
    pub error: OpenAIError,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

/// Parse a typical OpenAI-style error JSON body and return the message if present.
pub fn parse_openai_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OpenAIErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Status reported for an error object delivered inside a 2xx body.
const IN_BODY_ERROR_STATUS: u16 = 400;

/// Upstream error carried in an otherwise successful body, e.g. a streamed
/// `{"error": {...}}` event.
pub fn error_from_body(body: &serde_json::Value) -> Option<SdkError> {
    let error = body.get("error").filter(|v| !v.is_null())?;
    let message = error
        .get("message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| error.to_string());
    Some(SdkError::Upstream {
        status: IN_BODY_ERROR_STATUS,
        message,
        source: None,
    })
}

/// Map TransportError to SdkError using OpenAI error conventions.
///
/// Status errors keep the transport error as their source; nothing is retried here.
pub fn map_transport_error(te: TransportError) -> SdkError {
    match &te {
        TransportError::HttpStatus { status, body, .. } => {
            let message =
                parse_openai_error_message(body).unwrap_or_else(|| display_body_for_error(body));
            SdkError::Upstream {
                status: *status,
                message,
                source: Some(Box::new(te)),
            }
        }
        TransportError::IdleReadTimeout(_) | TransportError::ConnectTimeout(_) => SdkError::Timeout,
        _ => SdkError::Transport(te),
    }
}
