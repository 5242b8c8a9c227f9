//! Configuration for the order-entry API client
//!
//! The base URL is resolved once, from the environment or explicitly, and the
//! resulting [`ApiConfig`] is handed to the client by value. Nothing here is
//! global.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Fallback backend origin used when no override is present
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Primary environment override for the base URL
pub const API_URL_ENV: &str = "ORDER_ENTRY_API_URL";

/// Secondary override, shared with the web build tooling
pub const VITE_API_URL_ENV: &str = "VITE_API_URL";

/// Optional transport timeout in seconds
pub const TIMEOUT_ENV: &str = "ORDER_ENTRY_TIMEOUT_SECS";

/// Logical backend operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Endpoint {
    /// Connectivity test
    Test,
    /// Order creation/save
    CreateOrder,
    /// Customer lookup
    LookupCustomer,
    /// Product lookup
    LookupProduct,
}

impl Endpoint {
    /// Every endpoint, in declaration order
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Test,
        Endpoint::CreateOrder,
        Endpoint::LookupCustomer,
        Endpoint::LookupProduct,
    ];

    /// Logical key, e.g. `LOOKUP_PRODUCT`
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Test => "TEST",
            Self::CreateOrder => "CREATE_ORDER",
            Self::LookupCustomer => "LOOKUP_CUSTOMER",
            Self::LookupProduct => "LOOKUP_PRODUCT",
        }
    }

    /// Canonical path relative to the base URL
    #[must_use]
    pub fn default_path(self) -> &'static str {
        match self {
            Self::Test => "/api/test",
            Self::CreateOrder => "/api/orders/create/save",
            Self::LookupCustomer => "/api/orders/create/lookup_customer",
            Self::LookupProduct => "/api/orders/create/lookup_product",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_uppercase();
        Self::ALL
            .into_iter()
            .find(|e| e.key() == normalized)
            .ok_or_else(|| format!("unknown endpoint '{s}'"))
    }
}

/// Mapping from logical endpoint to URL path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EndpointPaths {
    /// Path for [`Endpoint::Test`]
    pub test: String,
    /// Path for [`Endpoint::CreateOrder`]
    pub create_order: String,
    /// Path for [`Endpoint::LookupCustomer`]
    pub lookup_customer: String,
    /// Path for [`Endpoint::LookupProduct`]
    pub lookup_product: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            test: Endpoint::Test.default_path().to_string(),
            create_order: Endpoint::CreateOrder.default_path().to_string(),
            lookup_customer: Endpoint::LookupCustomer.default_path().to_string(),
            lookup_product: Endpoint::LookupProduct.default_path().to_string(),
        }
    }
}

impl EndpointPaths {
    /// Resolve the path for an endpoint
    #[must_use]
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Test => &self.test,
            Endpoint::CreateOrder => &self.create_order,
            Endpoint::LookupCustomer => &self.lookup_customer,
            Endpoint::LookupProduct => &self.lookup_product,
        }
    }

    /// Iterate over `(endpoint, path)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Endpoint, &str)> {
        Endpoint::ALL.into_iter().map(move |e| (e, self.path(e)))
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme, host and optional port prepended to every endpoint path
    pub base_url: String,
    /// Endpoint paths
    #[serde(default)]
    pub endpoints: EndpointPaths,
    /// Transport timeout; `None` leaves it to the underlying transport
    #[serde(default, with = "optional_secs")]
    pub timeout: Option<Duration>,
}

mod optional_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            endpoints: EndpointPaths::default(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `ORDER_ENTRY_API_URL` or `VITE_API_URL`: backend base URL
    /// - `ORDER_ENTRY_TIMEOUT_SECS`: transport timeout in seconds
    ///
    /// The URL is taken verbatim. A malformed value only shows up once a
    /// request fails.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_ENV)
            .or_else(|_| env::var(VITE_API_URL_ENV))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::default()
            .with_base_url(base_url)
            .with_timeout_opt(timeout_from_env())
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to replace the endpoint mapping
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointPaths) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Builder-style method to set a transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn with_timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Concatenate the base URL and `path`
    ///
    /// No slash normalization happens: `base_url + path`, always.
    #[must_use]
    pub fn build_api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Full URL for a logical endpoint
    #[must_use]
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        self.build_api_url(self.endpoints.path(endpoint))
    }
}

fn timeout_from_env() -> Option<Duration> {
    env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, None);
        assert_eq!(config.endpoints, EndpointPaths::default());
    }

    #[test]
    fn test_lookup_customer_url() {
        let config = ApiConfig::default();
        assert_eq!(
            config.url_for(Endpoint::LookupCustomer),
            "http://localhost:8080/api/orders/create/lookup_customer"
        );
    }

    #[test]
    fn test_all_endpoint_urls() {
        let config = ApiConfig::default().with_base_url("https://orders.example.com");
        let urls: Vec<String> = Endpoint::ALL.iter().map(|e| config.url_for(*e)).collect();
        assert_eq!(
            urls,
            vec![
                "https://orders.example.com/api/test",
                "https://orders.example.com/api/orders/create/save",
                "https://orders.example.com/api/orders/create/lookup_customer",
                "https://orders.example.com/api/orders/create/lookup_product",
            ]
        );
    }

    #[test]
    fn test_no_slash_normalization() {
        let config = ApiConfig::default().with_base_url("http://host/");
        assert_eq!(config.build_api_url("/api/test"), "http://host//api/test");

        let config = ApiConfig::default().with_base_url("http://host");
        assert_eq!(config.build_api_url("api/test"), "http://hostapi/test");
    }

    #[test]
    fn test_endpoint_parse() {
        assert_eq!("LOOKUP_PRODUCT".parse::<Endpoint>(), Ok(Endpoint::LookupProduct));
        assert_eq!("lookup-customer".parse::<Endpoint>(), Ok(Endpoint::LookupCustomer));
        assert_eq!("create_order".parse::<Endpoint>(), Ok(Endpoint::CreateOrder));
        assert!("orders".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_endpoint_display_roundtrips_key() {
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.to_string().parse::<Endpoint>(), Ok(endpoint));
        }
    }

    #[test]
    fn test_custom_endpoint_paths() {
        let paths = EndpointPaths {
            test: "/ping".to_string(),
            ..EndpointPaths::default()
        };
        let config = ApiConfig::default().with_endpoints(paths);
        assert_eq!(config.url_for(Endpoint::Test), "http://localhost:8080/ping");
        assert_eq!(
            config.url_for(Endpoint::CreateOrder),
            "http://localhost:8080/api/orders/create/save"
        );
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: ApiConfig = serde_json::from_str(
            r#"{"base_url": "http://backend:9000", "endpoints": {"TEST": "/health"}, "timeout": 5}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.endpoints.test, "/health");
        assert_eq!(config.endpoints.lookup_product, "/api/orders/create/lookup_product");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    proptest! {
        #[test]
        fn prop_build_api_url_is_concatenation(base in ".{0,40}", path in ".{0,40}") {
            let config = ApiConfig::default().with_base_url(base.clone());
            prop_assert_eq!(config.build_api_url(&path), format!("{base}{path}"));
        }

        #[test]
        fn prop_url_for_uses_configured_path(base in "[a-z:/.0-9]{0,30}", idx in 0usize..4) {
            let endpoint = Endpoint::ALL[idx];
            let config = ApiConfig::default().with_base_url(base.clone());
            prop_assert_eq!(
                config.url_for(endpoint),
                format!("{}{}", base, endpoint.default_path())
            );
        }
    }
}
