//! Customer and product lookup endpoints
//!
//! Both lookups are `POST` requests whose filter travels in the query string:
//! - `page`: 1-based page number
//! - `customer_name` / `product_name`: name prefix, matched by the backend
//!
//! Paging is passed through untouched; the backend decides page size and
//! page count.

use crate::client::{OrderEntryClient, RequestOptions};
use crate::config::Endpoint;
use crate::error::ApiResult;
use crate::models::{CustomerLookupResponse, ProductLookupResponse};
use serde::{Deserialize, Serialize};

/// Lookup API interface
#[derive(Clone)]
pub struct LookupApi {
    client: OrderEntryClient,
}

impl LookupApi {
    /// Create a new lookup API interface
    pub(crate) fn new(client: OrderEntryClient) -> Self {
        Self { client }
    }

    /// Look up customers
    ///
    /// POST /api/orders/create/lookup_customer
    pub async fn customers(&self, query: &LookupQuery) -> ApiResult<CustomerLookupResponse> {
        let options = query.to_options("customer_name");
        self.client
            .api_call_endpoint(Endpoint::LookupCustomer, options)
            .await
    }

    /// Look up products
    ///
    /// POST /api/orders/create/lookup_product
    pub async fn products(&self, query: &LookupQuery) -> ApiResult<ProductLookupResponse> {
        let options = query.to_options("product_name");
        self.client
            .api_call_endpoint(Endpoint::LookupProduct, options)
            .await
    }
}

/// Filter and page for a lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    /// Name prefix filter
    pub name: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl LookupQuery {
    /// Create an unfiltered query for the first page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by name prefix
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Request a specific page
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    fn to_options(&self, name_param: &str) -> RequestOptions {
        let mut options = RequestOptions::post();
        if let Some(page) = self.page {
            options = options.query("page", page);
        }
        if let Some(ref name) = self.name {
            if !name.is_empty() {
                options = options.query(name_param, name);
            }
        }
        options
    }
}
