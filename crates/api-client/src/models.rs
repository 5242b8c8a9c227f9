//! Wire-format data contracts shared with the order-entry backend
//!
//! These are value shapes only. The backend owns creation and persistence;
//! this crate just describes what travels over the wire.

use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A customer order with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Backend-assigned identifier, only present in the save reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    /// Order date, sent as `YYYY-MM-DD`
    ///
    /// The backend echoes it back as an RFC 3339 timestamp; only the date
    /// part is kept.
    #[serde(deserialize_with = "date_or_timestamp")]
    pub order_date: NaiveDate,
    /// Free-text description
    pub description: String,
    /// Customer code
    pub customer_code: String,
    /// Customer name (the backend does not echo it back)
    #[serde(default)]
    pub customer_name: String,
    /// Backend-computed order total, only present in the save reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    /// Line items, in entry order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: Vec<OrderDetails>,
}

impl Order {
    /// Start an order for a customer with no lines yet
    pub fn new(order_date: NaiveDate, description: impl Into<String>, customer: &Customer) -> Self {
        Self {
            order_id: None,
            order_date,
            description: description.into(),
            customer_code: customer.customer_code.clone(),
            customer_name: customer.customer_name.clone(),
            total: None,
            details: Vec::new(),
        }
    }

    /// Append a line for `product`, numbering lines from 1 in insertion order
    pub fn push_line(&mut self, product: &Product, qty: f64) -> ApiResult<&OrderDetails> {
        let order_no = u32::try_from(self.details.len() + 1)
            .map_err(|_| ApiError::invalid_input("too many order lines"))?;
        let line = OrderDetails::new(
            order_no,
            product.product_code.clone(),
            product.product_name.clone(),
            product.product_price,
            qty,
        )?;
        self.details.push(line);
        Ok(&self.details[self.details.len() - 1])
    }

    /// Sum of all line totals
    #[must_use]
    pub fn computed_total(&self) -> f64 {
        self.details.iter().map(OrderDetails::line_total).sum()
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Owning order, only present in the save reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    /// Line number within the order
    pub order_no: u32,
    /// Product code (refers to a [`Product`] by convention)
    pub product_code: String,
    /// Product name at the time of ordering
    pub product_name: String,
    /// Unit price, non-negative
    pub unit_price: f64,
    /// Quantity, non-negative
    pub qty: f64,
    /// Backend-computed `unit_price * qty`, only present in the save reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
}

impl OrderDetails {
    /// Build a line, rejecting negative or non-finite price and quantity
    pub fn new(
        order_no: u32,
        product_code: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: f64,
        qty: f64,
    ) -> ApiResult<Self> {
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(ApiError::invalid_input(format!(
                "unit_price must be a non-negative number, got {unit_price}"
            )));
        }
        if !qty.is_finite() || qty < 0.0 {
            return Err(ApiError::invalid_input(format!(
                "qty must be a non-negative number, got {qty}"
            )));
        }

        Ok(Self {
            order_id: None,
            order_no,
            product_code: product_code.into(),
            product_name: product_name.into(),
            unit_price,
            qty,
            subtotal: None,
        })
    }

    /// `unit_price * qty`
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.qty
    }
}

/// A customer record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer code
    pub customer_code: String,
    /// Display name
    pub customer_name: String,
}

/// A product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product code
    pub product_code: String,
    /// Display name
    pub product_name: String,
    /// Current list price
    pub product_price: f64,
}

/// One page of lookup results
///
/// `num_rows` counts this page only. `is_empty` mirrors `data.is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct LookupResponse<T> {
    /// Rows on this page
    pub num_rows: u32,
    /// Page contents; `null` on the wire decodes as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    /// Total pages for the current filter
    pub total_pages: u32,
    /// True iff `data` is empty
    pub is_empty: bool,
}

/// Customer lookup page
pub type CustomerLookupResponse = LookupResponse<Customer>;

/// Product lookup page
pub type ProductLookupResponse = LookupResponse<Product>;

impl<T> LookupResponse<T> {
    /// Build a page whose counters agree with its contents
    #[must_use]
    pub fn from_page(data: Vec<T>, total_pages: u32) -> Self {
        Self {
            num_rows: u32::try_from(data.len()).unwrap_or(u32::MAX),
            is_empty: data.is_empty(),
            data,
            total_pages,
        }
    }

    /// Check that `is_empty` and `num_rows` agree with `data`
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.is_empty == self.data.is_empty()
            && usize::try_from(self.num_rows).is_ok_and(|n| n == self.data.len())
    }

    /// Whether a page after the 1-based `page` exists
    #[must_use]
    pub fn has_next_page(&self, page: u32) -> bool {
        page < self.total_pages
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn date_or_timestamp<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|ts| ts.date_naive()))
        .map_err(|_| D::Error::custom(format!("invalid order date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> Product {
        Product {
            product_code: "P001".to_string(),
            product_name: "Widget".to_string(),
            product_price: 2.5,
        }
    }

    fn acme() -> Customer {
        Customer {
            customer_code: "C001".to_string(),
            customer_name: "Acme".to_string(),
        }
    }

    #[test]
    fn test_order_serializes_wire_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut order = Order::new(date, "first order", &acme());
        order.push_line(&widget(), 4.0).unwrap();

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            json!({
                "order_date": "2024-03-09",
                "description": "first order",
                "customer_code": "C001",
                "customer_name": "Acme",
                "details": [{
                    "order_no": 1,
                    "product_code": "P001",
                    "product_name": "Widget",
                    "unit_price": 2.5,
                    "qty": 4.0
                }]
            })
        );
    }

    #[test]
    fn test_saved_order_deserialize() {
        let json = r#"{
            "order_id": 42,
            "order_date": "2024-03-09",
            "description": "first order",
            "customer_code": "C001",
            "total": 10,
            "details": [{
                "order_id": 42,
                "order_no": 1,
                "product_code": "P001",
                "product_name": "Widget",
                "unit_price": 2.5,
                "qty": 4,
                "subtotal": 10
            }]
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, Some(42));
        assert_eq!(order.customer_name, "");
        assert_eq!(order.total, Some(10.0));
        assert_eq!(order.details[0].subtotal, Some(10.0));
        assert_eq!(order.details[0].order_id, Some(42));
    }

    #[test]
    fn test_order_date_accepts_backend_timestamp() {
        let json = r#"{
            "order_date": "2024-05-01T00:00:00Z",
            "description": "",
            "customer_code": "C001",
            "details": null
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(order.details.is_empty());

        // Offset timestamps keep their local calendar date
        let json = json.replace("2024-05-01T00:00:00Z", "2024-05-01T23:30:00-05:00");
        let order: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            serde_json::to_value(&order).unwrap()["order_date"],
            "2024-05-01"
        );
    }

    #[test]
    fn test_order_date_rejects_other_formats() {
        let json = r#"{
            "order_date": "09/03/2024",
            "description": "",
            "customer_code": "C001",
            "details": []
        }"#;
        assert!(serde_json::from_str::<Order>(json).is_err());
    }

    #[test]
    fn test_push_line_numbers_sequentially() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut order = Order::new(date, "", &acme());
        order.push_line(&widget(), 1.0).unwrap();
        order.push_line(&widget(), 2.0).unwrap();
        let numbers: Vec<u32> = order.details.iter().map(|d| d.order_no).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!((order.computed_total() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_details_rejects_negative_values() {
        assert!(OrderDetails::new(1, "P", "p", -1.0, 1.0).is_err());
        assert!(OrderDetails::new(1, "P", "p", 1.0, -0.5).is_err());
        assert!(OrderDetails::new(1, "P", "p", f64::NAN, 1.0).is_err());
        assert!(OrderDetails::new(1, "P", "p", 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_lookup_response_deserialize() {
        let json = r#"{
            "num_rows": 2,
            "data": [
                {"customer_code": "C001", "customer_name": "Acme"},
                {"customer_code": "C002", "customer_name": "Acme Two"}
            ],
            "total_pages": 3,
            "is_empty": false
        }"#;

        let page: CustomerLookupResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.num_rows, 2);
        assert_eq!(page.data[1].customer_code, "C002");
        assert!(page.is_consistent());
        assert!(page.has_next_page(1));
        assert!(!page.has_next_page(3));
    }

    #[test]
    fn test_lookup_response_null_data() {
        let json = r#"{"num_rows": 0, "data": null, "total_pages": 0, "is_empty": true}"#;
        let page: ProductLookupResponse = serde_json::from_str(json).unwrap();
        assert!(page.data.is_empty());
        assert!(page.is_empty);
        assert!(page.is_consistent());
    }

    #[test]
    fn test_lookup_response_from_page() {
        let page = LookupResponse::from_page(vec![widget()], 1);
        assert_eq!(page.num_rows, 1);
        assert!(!page.is_empty);
        assert!(page.is_consistent());

        let empty: LookupResponse<Product> = LookupResponse::from_page(Vec::new(), 0);
        assert!(empty.is_empty);
        assert!(empty.is_consistent());
    }

    #[test]
    fn test_lookup_response_inconsistent() {
        let page = LookupResponse {
            num_rows: 0,
            data: vec![acme()],
            total_pages: 1,
            is_empty: true,
        };
        assert!(!page.is_consistent());
    }
}
