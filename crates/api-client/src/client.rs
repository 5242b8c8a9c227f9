//! Main API client implementation

use crate::config::{ApiConfig, Endpoint};
use crate::endpoints::{DiagnosticsApi, LookupApi, OrdersApi};
use crate::error::{ApiError, ApiResult, ErrorContext};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Order-entry API client
///
/// A thin wrapper over `reqwest`: every call is a single attempt with default
/// JSON headers, status errors carrying the HTTP code, and JSON decoding of
/// the body. The client keeps no per-call state.
#[derive(Clone)]
pub struct OrderEntryClient {
    inner: Client,
    config: Arc<ApiConfig>,
}

/// Options for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, `GET` unless set
    pub method: Method,
    /// Caller headers; these win over the defaults
    pub headers: HeaderMap,
    /// Raw request body
    pub body: Option<Vec<u8>>,
    /// Query string pairs appended to the URL
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options for a `GET` request
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// Options for a `POST` request
    #[must_use]
    pub fn post() -> Self {
        Self::default().method(Method::POST)
    }

    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add or replace a header
    pub fn header(mut self, name: &str, value: &str) -> ApiResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Replace all caller headers
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set a raw body
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, value: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_vec(value).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Append a query pair
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Merge the default `Content-Type: application/json` with caller headers
///
/// Caller headers are kept as given. The default is only added when the
/// caller did not set a `Content-Type` of their own.
#[must_use]
pub fn merge_headers(caller: &HeaderMap) -> HeaderMap {
    let mut merged = caller.clone();
    if !merged.contains_key(CONTENT_TYPE) {
        merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    merged
}

impl OrderEntryClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ApiConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ApiConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(ApiError::Transport)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the connectivity test endpoint
    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticsApi {
        DiagnosticsApi::new(self.clone())
    }

    /// Access order endpoints
    #[must_use]
    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(self.clone())
    }

    /// Access customer and product lookups
    #[must_use]
    pub fn lookup(&self) -> LookupApi {
        LookupApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Request helper
    // -------------------------------------------------------------------------

    /// Call a logical endpoint
    pub async fn api_call_endpoint<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.api_call(self.config.endpoints.path(endpoint), options)
            .await
    }

    /// Perform one request against `base_url + path` and decode the JSON body
    ///
    /// Exactly one attempt is made. A non-2xx status becomes
    /// [`ApiError::Status`], an undecodable body becomes [`ApiError::Decode`],
    /// and anything that stops a response from arriving becomes
    /// [`ApiError::Transport`].
    #[instrument(skip(self, options), fields(request_id))]
    pub async fn api_call<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let url = self.config.build_api_url(path);
        let ctx = ErrorContext {
            request_id: Some(request_id),
            url: url.clone(),
            method: options.method.to_string(),
        };

        debug!(
            base_url = %self.config.base_url,
            method = %options.method,
            url = %url,
            headers = ?options.headers,
            query = ?options.query,
            body_len = options.body.as_ref().map_or(0, Vec::len),
            "API call"
        );

        let start = Instant::now();
        let result = self.execute(&url, options).await;

        match &result {
            Ok(_) => debug!(
                elapsed_ms = start.elapsed().as_millis(),
                "API call succeeded"
            ),
            Err(e) => error!(request = %ctx, error = %e, "API call failed"),
        }

        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let RequestOptions {
            method,
            headers,
            body,
            query,
        } = options;

        let mut request = self
            .inner
            .request(method, url)
            .headers(merge_headers(&headers));

        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        handle_response(response).await
    }
}

/// Turn an HTTP response into a decoded payload or an error
async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();

    if status.is_success() {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    } else {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "failed to read error body");
                String::default()
            }
        };
        Err(ApiError::status(status.as_u16(), body))
    }
}
