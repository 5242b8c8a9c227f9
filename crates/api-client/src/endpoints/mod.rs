//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a set of backend endpoints.
//!
//! ## Mapping to the order-entry backend
//!
//! | Module | Endpoint key | Path |
//! |--------|--------------|------|
//! | `diagnostics` | `TEST` | `/api/test` |
//! | `orders` | `CREATE_ORDER` | `/api/orders/create/save` |
//! | `lookup` | `LOOKUP_CUSTOMER`, `LOOKUP_PRODUCT` | `/api/orders/create/lookup_*` |

pub mod diagnostics;
pub mod lookup;
pub mod orders;

pub use diagnostics::{DiagnosticsApi, TestResponse};
pub use lookup::{LookupApi, LookupQuery};
pub use orders::OrdersApi;
