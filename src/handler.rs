use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::UpstreamConfig;
use crate::ProxyError;

/// Status and JSON body produced for a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

impl From<crate::Result<Value>> for ProxyResponse {
    fn from(result: crate::Result<Value>) -> Self {
        match result {
            Ok(body) => ProxyResponse::ok(body),
            Err(e) => ProxyResponse {
                status: e.status(),
                body: e.body(),
            },
        }
    }
}

/// Forwards `generateContent` payloads to the upstream API with the
/// server-side key attached.
pub struct ProxyHandler {
    http: HttpClient,
    upstream: UpstreamConfig,
    api_key: Option<SecretString>,
}

impl ProxyHandler {
    pub fn new(upstream: UpstreamConfig, api_key: Option<SecretString>) -> Self {
        Self::with_client(HttpClient::new(), upstream, api_key)
    }

    pub fn with_client(
        http: HttpClient,
        upstream: UpstreamConfig,
        api_key: Option<SecretString>,
    ) -> Self {
        Self { http, upstream, api_key }
    }

    /// Handle one inbound request. Always produces exactly one response.
    pub async fn handle(&self, method: &str, body: &[u8]) -> ProxyResponse {
        self.proxy(method, body).await.into()
    }

    async fn proxy(&self, method: &str, body: &[u8]) -> crate::Result<Value> {
        if method != "POST" {
            return Err(ProxyError::MethodNotAllowed(method.to_string()));
        }

        let api_key = match &self.api_key {
            Some(key) if !key.expose_secret().is_empty() => key,
            _ => {
                error!("{} is not configured", crate::config::API_KEY_ENV);
                return Err(ProxyError::MissingApiKey);
            }
        };

        let payload = parse_payload(body)?;

        match self.forward(api_key, &payload).await {
            Err(e @ ProxyError::Upstream { .. }) => {
                warn!("Gemini API error: {}", e);
                Err(e)
            }
            Err(e) => {
                error!("Server-side error: {}", e);
                Err(e)
            }
            ok => ok,
        }
    }

    async fn forward(&self, api_key: &SecretString, payload: &Value) -> crate::Result<Value> {
        let mut url = Url::parse(&self.upstream.endpoint())?;
        url.query_pairs_mut().append_pair("key", api_key.expose_secret());

        debug!("Forwarding request to {}", self.upstream.endpoint());

        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let data: Value = response.json().await?;

        if !status.is_success() {
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message: upstream_error_message(&data),
            });
        }

        Ok(data)
    }
}

/// The body must be a JSON object with a non-null `contents` field. Anything else,
/// including an empty or non-JSON body, is a bad request.
fn parse_payload(body: &[u8]) -> crate::Result<Value> {
    if body.is_empty() {
        return Err(ProxyError::BadRequest("empty body".to_string()));
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ProxyError::BadRequest(format!("invalid JSON: {}", e)))?;

    match payload.as_object() {
        Some(obj) if obj.get("contents").is_some_and(|c| !c.is_null()) => Ok(payload),
        _ => Err(ProxyError::BadRequest("missing contents".to_string())),
    }
}

/// Gemini reports failures as `{ "error": { "message": ... } }`.
fn upstream_error_message(data: &Value) -> Option<String> {
    data.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}
