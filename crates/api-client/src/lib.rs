//! API client for the order-entry backend
//!
//! This crate holds everything the order-entry front end needs to talk to its
//! backend: the wire-format data contracts, the endpoint configuration, and a
//! thin request helper.
//!
//! # Features
//!
//! - **Injected configuration**: base URL resolved once from the environment
//!   (or set explicitly) and shared read-only with the client
//! - **Pure URL building**: base URL and endpoint path are concatenated as-is
//! - **Single-attempt requests**: default JSON headers, status errors carrying
//!   the HTTP code, JSON decoding of the body; no retry, no caching
//!
//! # Example
//!
//! ```rust,no_run
//! use order_entry_api_client::{ApiConfig, LookupQuery, OrderEntryClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OrderEntryClient::with_config(ApiConfig::from_env())?;
//!
//!     let ping = client.diagnostics().test().await?;
//!     println!("backend says: {}", ping.message);
//!
//!     let page = client
//!         .lookup()
//!         .customers(&LookupQuery::new().with_name("Ac"))
//!         .await?;
//!     println!("{} customers on this page", page.num_rows);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::{merge_headers, OrderEntryClient, RequestOptions};
pub use config::{ApiConfig, Endpoint, EndpointPaths, DEFAULT_API_URL};
pub use endpoints::LookupQuery;
pub use error::{ApiError, ApiResult};
pub use models::{
    Customer, CustomerLookupResponse, LookupResponse, Order, OrderDetails, Product,
    ProductLookupResponse,
};
pub use reqwest::header::HeaderMap;
pub use reqwest::Method;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{OrderEntryClient, RequestOptions};
    pub use crate::config::{ApiConfig, Endpoint};
    pub use crate::endpoints::{DiagnosticsApi, LookupApi, LookupQuery, OrdersApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::models::{
        Customer, CustomerLookupResponse, LookupResponse, Order, OrderDetails, Product,
        ProductLookupResponse,
    };
}
