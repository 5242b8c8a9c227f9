//! Backend proxy for the dev and preview servers
//!
//! Requests under the configured prefix are replayed against the backend
//! origin with their path and query unchanged. Each request is forwarded once;
//! upstream failures come back as `502 Bad Gateway`.

use crate::config::ProxyConfig;
use crate::error::WebResult;
use axum::body::{Body, Bytes, HttpBody};
use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::fmt;
use std::future::poll_fn;
use std::pin::Pin;
use tracing::{debug, warn};

/// Largest request body the proxy will buffer
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Connection-scoped headers that must not be forwarded
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

/// Why a request could not be forwarded
#[derive(Debug)]
enum ForwardError {
    /// Request body exceeds [`MAX_BODY_BYTES`]
    TooLarge,
    /// Reading the request or talking to the backend failed
    Upstream(String),
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge => write!(f, "request body exceeds {MAX_BODY_BYTES} bytes"),
            Self::Upstream(msg) => f.write_str(msg),
        }
    }
}

/// Forwarding state shared by all proxied requests
#[derive(Clone)]
pub struct Proxy {
    client: Client,
    config: ProxyConfig,
}

impl Proxy {
    /// Build a proxy for `config`
    pub fn new(config: ProxyConfig) -> WebResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.secure)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client, config })
    }

    /// Whether `path` belongs to the backend
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.config.matches(path)
    }

    /// Upstream URL for a request path and query
    #[must_use]
    pub fn upstream_url(&self, path_and_query: &str) -> String {
        format!(
            "{}{}",
            self.config.target.trim_end_matches('/'),
            path_and_query
        )
    }

    /// Forward `request` and convert the upstream reply
    pub async fn forward(&self, request: Request) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match self.try_forward(request).await {
            Ok(response) => {
                debug!(%method, %path, status = %response.status(), "proxied");
                response
            }
            Err(ForwardError::TooLarge) => {
                warn!(%method, %path, limit = MAX_BODY_BYTES, "request body too large");
                StatusCode::PAYLOAD_TOO_LARGE.into_response()
            }
            Err(e) => {
                warn!(%method, %path, error = %e, "proxy request failed");
                (StatusCode::BAD_GATEWAY, format!("proxy error: {e}")).into_response()
            }
        }
    }

    async fn try_forward(&self, request: Request) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);
        let url = self.upstream_url(&path_and_query);

        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
            return Err(ForwardError::TooLarge);
        }
        let body = read_body(body, MAX_BODY_BYTES).await?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);
        if self.config.change_origin {
            // reqwest fills in Host from the target URL
            headers.remove(header::HOST);
        }

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| ForwardError::Upstream(e.to_string()))?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);
        response_headers.remove(header::CONTENT_LENGTH);

        let bytes = upstream
            .bytes()
            .await
            .map_err(|e| ForwardError::Upstream(e.to_string()))?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

/// Buffer `body`, failing once more than `limit` bytes have arrived
async fn read_body(mut body: Body, limit: usize) -> Result<Bytes, ForwardError> {
    let mut buf = Vec::new();
    while let Some(frame) = poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await {
        let frame = frame.map_err(|e| ForwardError::Upstream(e.to_string()))?;
        if let Ok(data) = frame.into_data() {
            if buf.len() + data.len() > limit {
                return Err(ForwardError::TooLarge);
            }
            buf.extend_from_slice(&data);
        }
    }
    Ok(Bytes::from(buf))
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
}
