pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ENDPOINT_PATH: &str = "/chat/completions";

/// Where and how the OpenAI client sends chat completion requests.
#[derive(Clone, Debug)]
pub struct OpenAIConfig {
    pub base_url: String,
    /// Path after base_url (default: "/chat/completions").
    pub endpoint_path: String,
    /// Static headers to include for every request (lower-case keys preferred).
    pub headers: Vec<(String, String)>,
    /// Query params appended to the request URL.
    pub query_params: Vec<(String, String)>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.into(),
            headers: vec![
                ("content-type".into(), "application/json".into()),
                ("accept".into(), "application/json".into()),
            ],
            query_params: Vec::new(),
        }
    }
}

impl OpenAIConfig {
    pub fn endpoint_url(&self) -> String {
        let base_trimmed = self.base_url.trim_end_matches('/');
        let mut ep = self.endpoint_path.trim_start_matches('/');
        // Guard against double "/v1" if caller supplied base_url ending with /v1
        if base_trimmed.ends_with("/v1") && ep.starts_with("v1/") {
            ep = &ep[3..];
        }
        let mut url = format!("{}/{}", base_trimmed, ep);
        if !self.query_params.is_empty() {
            let qp = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&qp);
        }
        url
    }

    /// Replace (case-insensitively) or add a header.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_ascii_lowercase(), value.into()));
    }
}
