//! Performs one HTTP round-trip per validated call.
//!
//! # Design
//! `Dispatcher` owns the base URL and the fixed header set, both derived from
//! `Config` at construction. `build_request` and `parse_response` are pure so
//! the wire shape can be tested without a server; `send` glues them around a
//! `Transport`. The default transport is a blocking `ureq` agent. Anything
//! that implements `Transport` (including a plain closure) can replace it.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{ApiCall, HttpMethod, HttpRequest, HttpResponse};

/// Executes an `HttpRequest` and returns whatever the server answered.
///
/// Implementations must return non-2xx responses as `Ok`; status handling
/// belongs to `Dispatcher::parse_response`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let mut response = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse { status, headers, body })
    }
}

/// Sends validated calls to the Payant API and decodes the JSON replies.
#[derive(Clone)]
pub struct Dispatcher<T = UreqTransport> {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: T,
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Dispatcher<UreqTransport> {
    pub fn new(config: &Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: &Config, transport: T) -> Self {
        let headers = vec![
            ("Authorization".to_string(), format!("Bearer {}", config.private_key)),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        Self {
            base_url: config.base_url(),
            headers,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Turn a call into a full request. GET and DELETE never carry a body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let body = match payload {
            Some(payload) if method.has_body() => {
                Some(serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?)
            }
            _ => None,
        };

        Ok(HttpRequest {
            method,
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            headers: self.headers.clone(),
            body,
        })
    }

    /// Decode a 2xx body as JSON. An empty body decodes to `null`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Perform exactly one request and return the decoded body.
    pub fn send(&self, method: HttpMethod, path: &str, payload: Option<&Value>) -> Result<Value, ApiError> {
        let request = self.build_request(method, path, payload)?;
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.execute(&request)?;
        debug!(status = response.status, "received response");

        self.parse_response(response)
    }

    pub fn dispatch(&self, call: &ApiCall) -> Result<Value, ApiError> {
        self.send(call.method, &call.path, call.payload.as_ref())
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
