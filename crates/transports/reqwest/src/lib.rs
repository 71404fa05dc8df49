use crate::ai_sdk_core::error::{display_body_for_error, TransportError};
use crate::ai_sdk_core::json::without_null_fields;
use crate::ai_sdk_core::transport::{ByteStream, HttpTransport, TransportConfig};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde_json::Value;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::debug;

const LOG_TARGET: &str = "ai_sdk::transport::reqwest";

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(cfg.connect_timeout);
        if let Some(req_timeout) = cfg.request_timeout {
            builder = builder.timeout(req_timeout);
        }
        let client = builder.build().map_err(|err| {
            TransportError::Other(format!(
                "reqwest client build failed: {}",
                format_reqwest_error_chain(&err)
            ))
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with the rest of an application.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// POST `body` as JSON and return the response if the status is 2xx.
    async fn send_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Response, TransportError> {
        let cleaned_body = if cfg.strip_null_fields {
            without_null_fields(body)
        } else {
            body.clone()
        };
        let mut req = self.client.post(url).json(&cleaned_body);
        for (k, v) in headers {
            // .json() already sets it
            if !k.eq_ignore_ascii_case("content-type") {
                req = req.header(k, v);
            }
        }

        let started = Instant::now();
        let resp = req.send().await.map_err(|e| {
            let detail = format_reqwest_error_chain(&e);
            debug!(target: LOG_TARGET, %url, %detail, "request failed");
            if e.is_connect() {
                TransportError::Network(format!("connect: {detail}"))
            } else if e.is_timeout() {
                TransportError::ConnectTimeout(cfg.connect_timeout)
            } else {
                TransportError::Network(detail)
            }
        })?;

        let status = resp.status();
        debug!(
            target: LOG_TARGET,
            %url,
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        if status.is_success() {
            return Ok(resp);
        }

        let res_headers = header_pairs(resp.headers());
        let body_text = resp.text().await.unwrap_or_default();
        let sanitized = display_body_for_error(&body_text);
        debug!(target: LOG_TARGET, status = status.as_u16(), %sanitized, "upstream error");
        Err(TransportError::HttpStatus {
            status: status.as_u16(),
            body: body_text,
            sanitized,
            headers: res_headers,
        })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    type StreamResponse = (ByteStream, Vec<(String, String)>);

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>) {
        resp
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        let resp = self.send_json(url, headers, body, cfg).await?;
        let res_headers = header_pairs(resp.headers());

        let idle = cfg.idle_read_timeout;
        let mut inner = resp.bytes_stream();
        let s = async_stream::try_stream! {
            loop {
                match tokio::time::timeout(idle, inner.next()).await {
                    Err(_) => Err(TransportError::IdleReadTimeout(idle))?,
                    Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        if e.is_timeout() {
                            Err(TransportError::IdleReadTimeout(idle))?;
                        } else {
                            Err(TransportError::BodyRead(e.to_string()))?;
                        }
                    }
                    Ok(Some(Ok(bytes))) => { yield bytes; }
                }
            }
        };
        Ok((Box::pin(s), res_headers))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        let resp = self.send_json(url, headers, body, cfg).await?;
        let res_headers = header_pairs(resp.headers());
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|_| TransportError::BodyRead(format!("invalid json ({} bytes)", text.len())))?;
        Ok((json, res_headers))
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
        .collect()
}

fn format_reqwest_error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
