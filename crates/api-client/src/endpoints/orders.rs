//! Order endpoints

use crate::client::{OrderEntryClient, RequestOptions};
use crate::config::Endpoint;
use crate::error::ApiResult;
use crate::models::Order;

/// Orders API interface
#[derive(Clone)]
pub struct OrdersApi {
    client: OrderEntryClient,
}

impl OrdersApi {
    /// Create a new orders API interface
    pub(crate) fn new(client: OrderEntryClient) -> Self {
        Self { client }
    }

    /// Save a new order
    ///
    /// POST /api/orders/create/save
    ///
    /// The backend replies with the stored order, including its `order_id`,
    /// line subtotals and the order total.
    pub async fn save(&self, order: &Order) -> ApiResult<Order> {
        let options = RequestOptions::post().json(order)?;
        self.client
            .api_call_endpoint(Endpoint::CreateOrder, options)
            .await
    }
}
