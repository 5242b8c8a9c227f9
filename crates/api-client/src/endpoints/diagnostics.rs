//! Connectivity test endpoint

use crate::client::{OrderEntryClient, RequestOptions};
use crate::config::Endpoint;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Connectivity test API interface
#[derive(Clone)]
pub struct DiagnosticsApi {
    client: OrderEntryClient,
}

impl DiagnosticsApi {
    /// Create a new diagnostics API interface
    pub(crate) fn new(client: OrderEntryClient) -> Self {
        Self { client }
    }

    /// Hit the test endpoint with `GET`
    pub async fn test(&self) -> ApiResult<TestResponse> {
        self.client
            .api_call_endpoint(Endpoint::Test, RequestOptions::get())
            .await
    }

    /// Hit the test endpoint with `POST`
    pub async fn test_post(&self) -> ApiResult<TestResponse> {
        self.client
            .api_call_endpoint(Endpoint::Test, RequestOptions::post())
            .await
    }

    /// Hit the test endpoint and report the round-trip time
    pub async fn test_timed(&self) -> ApiResult<(TestResponse, Duration)> {
        let start = Instant::now();
        let response = self.test().await?;
        Ok((response, start.elapsed()))
    }
}

/// Test endpoint reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResponse {
    /// Human-readable status line, e.g. "Test endpoint working"
    pub message: String,
}
