//! Provider builder types for ai-sdk-rs.
//!
//! Lightweight credentials/settings types that provider factories consume to
//! build an adapter: who to authenticate as, where to send requests, and how
//! long to wait.

use crate::ai_sdk_core::transport::TransportConfig;
use std::time::Duration;

/// Credentials provided by the application layer.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// API key string; interpreted per provider (often used as a bearer token).
    ApiKey(String),
    /// Bearer token (OAuth or equivalent), with or without the "Bearer " prefix.
    Bearer(String),
    /// No credentials provided; provider may fall back to environment.
    #[default]
    None,
}

impl Credentials {
    pub fn as_bearer(&self) -> Option<String> {
        match self {
            Credentials::Bearer(s) => Some(if s.to_lowercase().starts_with("bearer ") {
                s.clone()
            } else {
                format!("Bearer {}", s)
            }),
            _ => None,
        }
    }
    pub fn as_api_key(&self) -> Option<String> {
        match self {
            Credentials::ApiKey(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// `authorization` header value, falling back to the API key in `env_var`.
    ///
    /// Returns `None` when neither credentials nor the environment provide one.
    pub fn authorization_header(&self, env_var: &str) -> Option<String> {
        if let Some(bearer) = self.as_bearer() {
            return Some(bearer);
        }
        self.as_api_key()
            .or_else(|| read_env(env_var))
            .map(|key| format!("Bearer {}", key))
    }
}

/// Per-provider settings supplied alongside credentials.
///
/// Every field is optional; unset values fall back to the environment or to
/// the provider's defaults.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub base_url: Option<String>,
    pub endpoint_path: Option<String>,
    /// Extra headers merged over the provider defaults.
    pub headers: Vec<(String, String)>,
    pub query_params: Vec<(String, String)>,
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub stream_idle_timeout_ms: Option<u64>,
}

impl ProviderSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Explicit base URL, else `env_var`, else `default`.
    pub fn resolve_base_url(&self, env_var: &str, default: &str) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| read_env(env_var))
            .unwrap_or_else(|| default.to_string())
    }
}

/// Transport config for a provider, starting from `TransportConfig::default()`.
pub fn build_transport_config(settings: &ProviderSettings) -> TransportConfig {
    let mut cfg = TransportConfig::default();
    if let Some(ms) = settings.request_timeout_ms.filter(|ms| *ms > 0) {
        cfg.request_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = settings.connect_timeout_ms.filter(|ms| *ms > 0) {
        cfg.connect_timeout = Duration::from_millis(ms);
    }
    apply_stream_idle_timeout_ms(settings, &mut cfg);
    cfg
}

/// Apply a per-provider streaming idle timeout override to the transport config.
pub fn apply_stream_idle_timeout_ms(settings: &ProviderSettings, cfg: &mut TransportConfig) {
    if let Some(ms) = settings.stream_idle_timeout_ms {
        if ms > 0 {
            cfg.idle_read_timeout = Duration::from_millis(ms);
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "../tests/settings_tests.rs"]
mod settings_tests;
