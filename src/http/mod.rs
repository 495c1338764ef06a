//! Minimal JSON request helper.
//!
//! Every exchange is dumped to the `api` log target, bodies pretty-printed
//! when they are JSON. Transport errors, unexpected status codes and non-JSON
//! bodies all come back as typed [`PxError`]s so callers only deal with the
//! decoded JSON on the happy path.

use crate::config::HttpConfig;
use crate::core::error::PxError;
use crate::logging::API_TARGET;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, redirect};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::time::Duration;
use tracing::{debug, error};

pub const VALID_HTTP_RESP: [u16; 3] = [200, 201, 202];

const BINARY_PLACEHOLDER: &str = "<binary raw data>";

/// Client-wide knobs; reqwest fixes these when the client is built.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Verify TLS certificates
    pub verify: bool,
    pub allow_redirects: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(3100),
            timeout: Duration::from_secs(60),
            verify: true,
            allow_redirects: true,
        }
    }
}

impl TryFrom<&HttpConfig> for HttpSettings {
    type Error = PxError;

    fn try_from(config: &HttpConfig) -> Result<Self, PxError> {
        Ok(Self {
            connect_timeout: timeout_from_secs("http.connect_timeout_secs", config.connect_timeout_secs)?,
            timeout: timeout_from_secs("http.timeout_secs", config.timeout_secs)?,
            ..Self::default()
        })
    }
}

fn timeout_from_secs(key: &str, secs: f64) -> Result<Duration, PxError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| PxError::Config(format!("{} must be a finite, non-negative number of seconds, got {}", key, secs)))
}

/// Per-request inputs
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
    pub bearer_token: Option<String>,
    /// Add `Content-Type: application/json` unless a content type is given
    pub amend_headers: bool,
    /// Verify TLS certificates. Only the one-shot [`request`]/[`post`] honour
    /// this; an [`HttpClient`] takes it from its [`HttpSettings`].
    pub verify: bool,
    /// Follow redirects; same scope as `verify`
    pub allow_redirects: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            body: None,
            headers: Vec::new(),
            bearer_token: None,
            amend_headers: true,
            verify: true,
            allow_redirects: true,
        }
    }
}

impl RequestOptions {
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, PxError> {
        Ok(Self {
            body: Some(serde_json::to_string(payload)?),
            ..Self::default()
        })
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }
}

/// A session: one connection pool and one cookie jar shared by every request
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Result<Self, PxError> {
        let redirect_policy = if settings.allow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(!settings.verify)
            .redirect(redirect_policy)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Value, PxError> {
        self.request(Method::GET, url, options).await
    }

    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<Value, PxError> {
        self.request(Method::POST, url, options).await
    }

    /// Send a request and decode the JSON response body.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Value, PxError> {
        let headers = build_headers(&options)?;
        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(|e| {
            error!("building request to {} failed: {}", url, e);
            PxError::from(e)
        })?;

        debug!(
            target: API_TARGET,
            "{}",
            format_request_dump(
                request.method().as_str(),
                request.url().as_str(),
                request.headers(),
                request.body().and_then(|b| b.as_bytes()).unwrap_or_default(),
            )
        );

        let response = self.client.execute(request).await.map_err(|e| {
            error!("request to {} failed with exception: {}", url, e);
            PxError::from(e)
        })?;

        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let bytes = response.bytes().await?;
        debug!(
            target: API_TARGET,
            "{}",
            format_response_dump(status, &response_headers, &bytes)
        );

        if !VALID_HTTP_RESP.contains(&status) {
            error!("request to {} failed with response code {}", url, status);
            return Err(PxError::HttpStatus {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            error!("failed to parse response body from {} in JSON format", url);
            PxError::Json(format!("response body is not JSON: {}", e))
        })
    }
}

/// One-shot request on a fresh session with default timeouts and the TLS and
/// redirect behaviour from `options`.
pub async fn request(method: Method, url: &str, options: RequestOptions) -> Result<Value, PxError> {
    let settings = HttpSettings {
        verify: options.verify,
        allow_redirects: options.allow_redirects,
        ..HttpSettings::default()
    };
    HttpClient::new(&settings)?
        .request(method, url, options)
        .await
}

/// Shorthand for a one-shot POST.
pub async fn post(url: &str, options: RequestOptions) -> Result<Value, PxError> {
    request(Method::POST, url, options).await
}

fn build_headers(options: &RequestOptions) -> Result<HeaderMap, PxError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| PxError::Input(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| PxError::Input(format!("invalid header value for {}: {}", name, e)))?;
        headers.insert(name, value);
    }
    if options.amend_headers && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    if let Some(token) = &options.bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| PxError::Config("API token contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Pretty JSON with 4-space indents, or the input unchanged if it isn't JSON.
pub fn pretty_json(text: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return text.to_string();
    };
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    if value.serialize(&mut ser).is_err() {
        return text.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

fn render_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => pretty_json(text),
        Err(_) => BINARY_PLACEHOLDER.to_string(),
    }
}

fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<non-ascii>")
            };
            format!("{}: {}", name, shown)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn format_request_dump(method: &str, url: &str, headers: &HeaderMap, body: &[u8]) -> String {
    format!(
        "-----------Request----------->\n{} {}\n\n{}\n\n{}\n",
        method,
        url,
        render_headers(headers),
        render_body(body)
    )
}

pub(crate) fn format_response_dump(status: u16, headers: &HeaderMap, body: &[u8]) -> String {
    format!(
        "<-----------Response-----------\nStatus code:{}\n\n{}\n\n{}\n",
        status,
        render_headers(headers),
        render_body(body)
    )
}
