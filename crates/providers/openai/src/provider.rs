use crate::ai_sdk_core::SdkError;
use crate::ai_sdk_provider::{build_transport_config, Credentials, ProviderSettings};

use crate::provider_openai::chat::OpenAIChatAdapter;
use crate::provider_openai::client::OpenAIClient;
use crate::provider_openai::config::{OpenAIConfig, DEFAULT_BASE_URL, DEFAULT_ENDPOINT_PATH};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Client config from credentials and settings, with environment fallbacks.
///
/// Settings headers are applied last, so they may override the defaults
/// (including `authorization`).
pub fn build_openai_config(creds: &Credentials, settings: &ProviderSettings) -> OpenAIConfig {
    let mut config = OpenAIConfig {
        base_url: settings.resolve_base_url(BASE_URL_ENV, DEFAULT_BASE_URL),
        endpoint_path: settings
            .endpoint_path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT_PATH.to_string()),
        query_params: settings.query_params.clone(),
        ..OpenAIConfig::default()
    };
    match creds.authorization_header(API_KEY_ENV) {
        Some(auth) => config.set_header("authorization", auth),
        None => tracing::debug!(
            target: "ai_sdk::openai::provider",
            "no OpenAI credentials found; requests are sent unauthenticated"
        ),
    }
    for (name, value) in &settings.headers {
        config.set_header(name, value.clone());
    }
    config
}

/// Build a chat adapter for `model` backed by the reqwest transport.
pub fn create_openai_chat_adapter(
    model: &str,
    creds: &Credentials,
    settings: &ProviderSettings,
) -> Result<OpenAIChatAdapter, SdkError> {
    let config = build_openai_config(creds, settings);
    let transport_cfg = build_transport_config(settings);
    let http = crate::reqwest_transport::ReqwestTransport::try_new(&transport_cfg)
        .map_err(SdkError::Transport)?;
    tracing::debug!(
        target: "ai_sdk::openai::provider",
        model,
        base_url = %config.base_url,
        "created OpenAI chat adapter"
    );
    let client = OpenAIClient::new(config, http, transport_cfg);
    Ok(OpenAIChatAdapter::new(model, client))
}
